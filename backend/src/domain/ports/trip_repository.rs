//! Port for trip persistence, including the atomic seat reservation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{SeatReservation, Trip, TripDetails, TripId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trip repository adapters.
    pub enum TripPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "trip repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "trip repository query failed: {message}",
    }
}

/// Outcome of rewriting a trip's descriptive fields.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsUpdate {
    /// The row was rewritten; carries the stored trip.
    Updated(Trip),
    /// No trip with the requested id exists.
    NotFound,
    /// Bookings taken since the trip was read exceed the new capacity.
    CapacityConflict { current_bookings: i32 },
}

/// Port for reading and writing trips.
///
/// Adapters must make [`TripRepository::reserve_seat`] a single atomic
/// conditional mutation: concurrent callers never push `current_bookings`
/// past `max_people`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// All trips in store order.
    async fn list(&self) -> Result<Vec<Trip>, TripPersistenceError>;

    /// Find a trip by id.
    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripPersistenceError>;

    /// Persist a newly created trip.
    async fn insert(&self, trip: &Trip) -> Result<(), TripPersistenceError>;

    /// Overwrite descriptive fields without touching `current_bookings`.
    ///
    /// The write only lands while `current_bookings <= details.max_people`.
    async fn update_details(
        &self,
        id: &TripId,
        details: &TripDetails,
        updated_at: DateTime<Utc>,
    ) -> Result<DetailsUpdate, TripPersistenceError>;

    /// Remove a trip. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &TripId) -> Result<bool, TripPersistenceError>;

    /// Take one seat when `current_bookings < max_people`.
    async fn reserve_seat(
        &self,
        id: &TripId,
        at: DateTime<Utc>,
    ) -> Result<SeatReservation, TripPersistenceError>;
}
