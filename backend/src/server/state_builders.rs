//! Wire domain services onto the configured repositories.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::domain::ports::{AuthService, TripCommand, TripQuery, TripRepository, UserRepository};
use crate::domain::{AccountService, TripService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{MemoryTripRepository, MemoryUserRepository};
use crate::outbound::persistence::{DieselTripRepository, DieselUserRepository};
use crate::outbound::security::{Argon2Hasher, JwtTokenIssuer};

use super::ServerConfig;

/// Build the HTTP state over a user and trip repository pair.
///
/// Both services share the user repository so trip listings resolve the
/// same accounts the auth service writes.
pub fn build_http_state_with<U, T>(
    users: Arc<U>,
    trips: Arc<T>,
    tokens: JwtTokenIssuer,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    T: TripRepository + 'static,
{
    let auth: Arc<dyn AuthService> = Arc::new(AccountService::new(
        users.clone(),
        Arc::new(Argon2Hasher::new()),
        Arc::new(tokens),
        clock.clone(),
    ));
    let trip_service = Arc::new(TripService::new(trips, users, clock));
    HttpState::new(
        auth,
        trip_service.clone() as Arc<dyn TripCommand>,
        trip_service as Arc<dyn TripQuery>,
    )
}

/// Build the HTTP state from server configuration.
///
/// Uses the Diesel repositories when a pool is configured and the in-memory
/// store otherwise.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = JwtTokenIssuer::new(
        config.token_settings.secret(),
        config.token_ttl,
        clock.clone(),
    );
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            build_http_state_with(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselTripRepository::new(pool.clone())),
                tokens,
                clock,
            )
        }
        None => {
            info!("using in-memory repositories");
            build_http_state_with(
                Arc::new(MemoryUserRepository::new()),
                Arc::new(MemoryTripRepository::new()),
                tokens,
                clock,
            )
        }
    }
}
