//! Trip domain service.
//!
//! Implements the trip query and command driving ports. Mutations check the
//! caller's capability first; booking delegates to the repository's atomic
//! seat reservation so capacity holds under concurrent requests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::account_service::map_user_repository_error;
use crate::domain::ports::{
    DetailsUpdate, TripCommand, TripListing, TripPersistenceError, TripQuery, TripRepository,
    UserRepository,
};
use crate::domain::{
    Caller, Capability, Error, NOT_ADMIN_MESSAGE, SeatReservation, Trip, TripDetails, TripId,
    TripInput, TripValidationError, User, UserId, UserSummary, authorize,
};

/// Message returned when a trip id matches nothing.
pub const TRIP_NOT_FOUND_MESSAGE: &str = "Trip not found";
/// Message returned when a booking hits capacity.
pub const FULLY_BOOKED_MESSAGE: &str = "Trip is fully booked";

fn map_repository_error(error: TripPersistenceError) -> Error {
    match error {
        TripPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("trip repository unavailable: {message}"))
        }
        TripPersistenceError::Query { message } => {
            Error::internal(format!("trip repository error: {message}"))
        }
    }
}

fn trip_not_found() -> Error {
    Error::not_found(TRIP_NOT_FOUND_MESSAGE)
}

fn require_admin(caller: &Caller) -> Result<&User, Error> {
    authorize(caller, Capability::Admin)?;
    caller
        .user()
        .ok_or_else(|| Error::forbidden(NOT_ADMIN_MESSAGE))
}

/// Trip service implementing the query and command driving ports.
#[derive(Clone)]
pub struct TripService<T, U> {
    trips: Arc<T>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<T, U> TripService<T, U> {
    /// Create a new service with the trip and user repositories.
    pub fn new(trips: Arc<T>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            trips,
            users,
            clock,
        }
    }
}

impl<T, U> TripService<T, U>
where
    T: TripRepository,
    U: UserRepository,
{
    async fn creators_of(&self, trips: &[Trip]) -> Result<HashMap<UserId, UserSummary>, Error> {
        let ids: Vec<UserId> = trips
            .iter()
            .map(|trip| trip.created_by().clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = self
            .users
            .find_by_ids(&ids)
            .await
            .map_err(map_user_repository_error)?;
        Ok(users
            .into_iter()
            .map(|user| (user.id().clone(), user.summary()))
            .collect())
    }

    async fn load(&self, id: &TripId) -> Result<Trip, Error> {
        self.trips
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(trip_not_found)
    }
}

#[async_trait]
impl<T, U> TripQuery for TripService<T, U>
where
    T: TripRepository,
    U: UserRepository,
{
    async fn list_trips(&self) -> Result<Vec<TripListing>, Error> {
        let trips = self.trips.list().await.map_err(map_repository_error)?;
        let creators = self.creators_of(&trips).await?;
        Ok(trips
            .into_iter()
            .map(|trip| TripListing {
                creator: creators.get(trip.created_by()).cloned(),
                trip,
            })
            .collect())
    }

    async fn get_trip(&self, id: &TripId) -> Result<TripListing, Error> {
        let trip = self.load(id).await?;
        let creator = self
            .users
            .find_by_id(trip.created_by())
            .await
            .map_err(map_user_repository_error)?
            .map(|user| user.summary());
        Ok(TripListing { trip, creator })
    }
}

#[async_trait]
impl<T, U> TripCommand for TripService<T, U>
where
    T: TripRepository,
    U: UserRepository,
{
    async fn create_trip(&self, caller: &Caller, input: TripInput) -> Result<Trip, Error> {
        let admin = require_admin(caller)?;
        let details = TripDetails::try_from_input(input)?;
        let trip = Trip::create(
            TripId::random(),
            details,
            admin.id().clone(),
            self.clock.utc(),
        );
        self.trips
            .insert(&trip)
            .await
            .map_err(map_repository_error)?;
        info!(trip_id = %trip.id(), created_by = %admin.id(), "trip created");
        Ok(trip)
    }

    async fn update_trip(
        &self,
        caller: &Caller,
        id: &TripId,
        patch: TripInput,
    ) -> Result<Trip, Error> {
        require_admin(caller)?;
        let now = self.clock.utc();
        let merged = self.load(id).await?.patched(patch, now)?;
        let outcome = self
            .trips
            .update_details(id, merged.details(), now)
            .await
            .map_err(map_repository_error)?;
        match outcome {
            DetailsUpdate::Updated(trip) => {
                info!(trip_id = %id, "trip updated");
                Ok(trip)
            }
            DetailsUpdate::NotFound => Err(trip_not_found()),
            DetailsUpdate::CapacityConflict { current_bookings } => {
                Err(TripValidationError::BelowCurrentBookings { current_bookings }.into())
            }
        }
    }

    async fn delete_trip(&self, caller: &Caller, id: &TripId) -> Result<(), Error> {
        require_admin(caller)?;
        let deleted = self.trips.delete(id).await.map_err(map_repository_error)?;
        if !deleted {
            return Err(trip_not_found());
        }
        info!(trip_id = %id, "trip deleted");
        Ok(())
    }

    async fn book_trip(&self, caller: &Caller, id: &TripId) -> Result<Trip, Error> {
        authorize(caller, Capability::Authenticated)?;
        let outcome = self
            .trips
            .reserve_seat(id, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        match outcome {
            SeatReservation::Reserved(trip) => {
                info!(
                    trip_id = %id,
                    current_bookings = trip.current_bookings(),
                    max_people = trip.details().max_people,
                    "seat reserved"
                );
                Ok(trip)
            }
            SeatReservation::FullyBooked => Err(Error::fully_booked(FULLY_BOOKED_MESSAGE)),
            SeatReservation::NotFound => Err(trip_not_found()),
        }
    }
}

#[cfg(test)]
#[path = "trip_service_tests.rs"]
mod tests;
