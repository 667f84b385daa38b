//! In-memory `TripRepository`.
//!
//! Seat reservation runs inside one write-lock critical section, so the
//! capacity check and the increment cannot interleave with another booking.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{DetailsUpdate, TripPersistenceError, TripRepository};
use crate::domain::{SeatReservation, Trip, TripDetails, TripId};

#[derive(Default)]
struct Trips {
    order: Vec<TripId>,
    by_id: HashMap<TripId, Trip>,
}

/// `TripRepository` backed by a process-local map. Listing follows insertion
/// order.
#[derive(Default)]
pub struct MemoryTripRepository {
    trips: RwLock<Trips>,
}

impl MemoryTripRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TripRepository for MemoryTripRepository {
    async fn list(&self) -> Result<Vec<Trip>, TripPersistenceError> {
        let trips = self.trips.read().await;
        Ok(trips
            .order
            .iter()
            .filter_map(|id| trips.by_id.get(id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, TripPersistenceError> {
        Ok(self.trips.read().await.by_id.get(id).cloned())
    }

    async fn insert(&self, trip: &Trip) -> Result<(), TripPersistenceError> {
        let mut trips = self.trips.write().await;
        let id = trip.id();
        if trips.by_id.insert(id, trip.clone()).is_none() {
            trips.order.push(id);
        }
        Ok(())
    }

    async fn update_details(
        &self,
        id: &TripId,
        details: &TripDetails,
        updated_at: DateTime<Utc>,
    ) -> Result<DetailsUpdate, TripPersistenceError> {
        let mut trips = self.trips.write().await;
        let Some(stored) = trips.by_id.get_mut(id) else {
            return Ok(DetailsUpdate::NotFound);
        };
        let current_bookings = stored.current_bookings();
        if current_bookings > details.max_people {
            return Ok(DetailsUpdate::CapacityConflict { current_bookings });
        }
        let mut record = stored.clone().into_record();
        record.details = details.clone();
        record.updated_at = updated_at;
        *stored = Trip::restore(record);
        Ok(DetailsUpdate::Updated(stored.clone()))
    }

    async fn delete(&self, id: &TripId) -> Result<bool, TripPersistenceError> {
        let mut trips = self.trips.write().await;
        if trips.by_id.remove(id).is_none() {
            return Ok(false);
        }
        trips.order.retain(|existing| existing != id);
        Ok(true)
    }

    async fn reserve_seat(
        &self,
        id: &TripId,
        at: DateTime<Utc>,
    ) -> Result<SeatReservation, TripPersistenceError> {
        let mut trips = self.trips.write().await;
        let Some(trip) = trips.by_id.get_mut(id) else {
            return Ok(SeatReservation::NotFound);
        };
        if trip.reserve_seat(at) {
            Ok(SeatReservation::Reserved(trip.clone()))
        } else {
            Ok(SeatReservation::FullyBooked)
        }
    }
}
