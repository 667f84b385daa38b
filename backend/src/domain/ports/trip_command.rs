//! Driving port for trip mutations.
//!
//! Every operation receives the resolved [`Caller`] and checks its capability
//! before touching the store, so adapters cannot skip authorization.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Trip, TripId, TripInput};

/// Domain use-case port for creating, editing, deleting, and booking trips.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripCommand: Send + Sync {
    /// Create a trip owned by the calling admin.
    async fn create_trip(&self, caller: &Caller, input: TripInput) -> Result<Trip, Error>;

    /// Merge the fields present in `patch` into an existing trip.
    async fn update_trip(
        &self,
        caller: &Caller,
        id: &TripId,
        patch: TripInput,
    ) -> Result<Trip, Error>;

    /// Delete a trip regardless of its bookings.
    async fn delete_trip(&self, caller: &Caller, id: &TripId) -> Result<(), Error>;

    /// Take one seat on a trip for the calling user.
    async fn book_trip(&self, caller: &Caller, id: &TripId) -> Result<Trip, Error>;
}
