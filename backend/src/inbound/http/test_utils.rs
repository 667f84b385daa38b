//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::{TimeZone, Utc};

use crate::domain::ports::{MockAuthService, MockTripCommand, MockTripQuery};
use crate::domain::{Email, Error, TOKEN_FAILED_MESSAGE, User, UserId, UserName};

use super::state::HttpState;

/// Token the mocked auth service resolves to [`admin`].
pub const ADMIN_TOKEN: &str = "admin-token";
/// Token the mocked auth service resolves to [`traveller`].
pub const TRAVELLER_TOKEN: &str = "traveller-token";

fn user(id: &str, name: &str, email: &str, is_admin: bool) -> User {
    let created_at = Utc
        .with_ymd_and_hms(2026, 1, 15, 8, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    User::new(
        UserId::new(id).expect("fixture id"),
        UserName::new(name).expect("fixture name"),
        Email::new(email).expect("fixture email"),
        is_admin,
        created_at,
    )
}

/// Fixture admin account.
pub fn admin() -> User {
    user(
        "11111111-1111-4111-8111-111111111111",
        "Ada Admin",
        "ada@example.com",
        true,
    )
}

/// Fixture non-admin account.
pub fn traveller() -> User {
    user(
        "22222222-2222-4222-8222-222222222222",
        "Tom Traveller",
        "tom@example.com",
        false,
    )
}

/// Mock auth service resolving [`ADMIN_TOKEN`] and [`TRAVELLER_TOKEN`].
///
/// Every other token fails verification.
pub fn resolving_auth() -> MockAuthService {
    let mut auth = MockAuthService::new();
    auth.expect_resolve_token()
        .times(0..)
        .returning(|token| match token {
            ADMIN_TOKEN => Ok(admin()),
            TRAVELLER_TOKEN => Ok(traveller()),
            _ => Err(Error::unauthorized(TOKEN_FAILED_MESSAGE)),
        });
    auth
}

/// Bundle mocks into `web::Data<HttpState>`.
pub fn state(
    auth: MockAuthService,
    trips: MockTripCommand,
    trips_query: MockTripQuery,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(auth),
        Arc::new(trips),
        Arc::new(trips_query),
    ))
}

/// `Authorization` header value for `token`.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
