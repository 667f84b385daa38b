//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities and the use-cases that act
//! on them. Nothing in here depends on Actix, Diesel, or any other adapter.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failure payload.
//! - TraceId: request correlation identifier.
//! - User, Email, UserName: account identity.
//! - Trip, TripDetails, TripInput: bookable trips and their validation.
//! - Caller, Capability, authorize: access decisions.
//! - AccountService, TripService: driving port implementations.

pub mod access;
pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod trip;
pub mod trip_service;
pub mod user;

pub use self::access::{
    Caller, Capability, NO_TOKEN_MESSAGE, NOT_ADMIN_MESSAGE, TOKEN_FAILED_MESSAGE, authorize,
};
pub use self::account_service::{
    AccountService, DUPLICATE_EMAIL_MESSAGE, INVALID_CREDENTIALS_MESSAGE,
};
pub use self::auth::{CredentialValidationError, LoginCredentials, PASSWORD_MIN, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trip::{
    DEFAULT_TRIP_IMAGE, SeatReservation, Trip, TripDetails, TripField, TripId, TripInput,
    TripRecord, TripValidationError,
};
pub use self::trip_service::{FULLY_BOOKED_MESSAGE, TRIP_NOT_FOUND_MESSAGE, TripService};
pub use self::user::{
    Email, PasswordDigest, USER_NAME_MAX, User, UserAccount, UserId, UserName, UserSummary,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use travel_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
