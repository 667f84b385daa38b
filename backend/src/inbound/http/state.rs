//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AuthService, TripCommand, TripQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
    pub trips: Arc<dyn TripCommand>,
    pub trips_query: Arc<dyn TripQuery>,
}

impl HttpState {
    /// Construct state from the driving ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use travel_backend::domain::{AccountService, TripService};
    /// use travel_backend::inbound::http::state::HttpState;
    /// use travel_backend::outbound::memory::{MemoryTripRepository, MemoryUserRepository};
    /// use travel_backend::outbound::security::{Argon2Hasher, JwtTokenIssuer};
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let users = Arc::new(MemoryUserRepository::new());
    /// let tokens = JwtTokenIssuer::new(&[7; 32], chrono::Duration::days(1), clock.clone());
    /// let auth = AccountService::new(
    ///     users.clone(),
    ///     Arc::new(Argon2Hasher::new()),
    ///     Arc::new(tokens),
    ///     clock.clone(),
    /// );
    /// let trips = Arc::new(TripService::new(
    ///     Arc::new(MemoryTripRepository::new()),
    ///     users,
    ///     clock,
    /// ));
    /// let state = HttpState::new(Arc::new(auth), trips.clone(), trips);
    /// let _auth = state.auth.clone();
    /// ```
    pub fn new(
        auth: Arc<dyn AuthService>,
        trips: Arc<dyn TripCommand>,
        trips_query: Arc<dyn TripQuery>,
    ) -> Self {
        Self {
            auth,
            trips,
            trips_query,
        }
    }
}
