//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod credential_hasher;
mod token_issuer;
mod trip_command;
mod trip_query;
mod trip_repository;
mod user_repository;

#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::{AuthService, AuthSession};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{BearerToken, TokenError, TokenIssuer};
#[cfg(test)]
pub use trip_command::MockTripCommand;
pub use trip_command::TripCommand;
#[cfg(test)]
pub use trip_query::MockTripQuery;
pub use trip_query::{TripListing, TripQuery};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::{DetailsUpdate, TripPersistenceError, TripRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
