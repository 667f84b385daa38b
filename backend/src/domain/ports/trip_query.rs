//! Driving port for public trip reads.

use async_trait::async_trait;

use crate::domain::{Error, Trip, TripId, UserSummary};

/// A trip with its creator resolved, or `None` when that user is gone.
#[derive(Debug, Clone, PartialEq)]
pub struct TripListing {
    pub trip: Trip,
    pub creator: Option<UserSummary>,
}

/// Domain use-case port for reading trips.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripQuery: Send + Sync {
    /// Every trip in store order.
    async fn list_trips(&self) -> Result<Vec<TripListing>, Error>;

    /// One trip, or `not_found`.
    async fn get_trip(&self, id: &TripId) -> Result<TripListing, Error>;
}
