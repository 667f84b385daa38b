//! Driving port for registration, login, and bearer token resolution.
//!
//! Inbound adapters call it to authenticate callers without knowing (or
//! importing) the hashing, signing, or persistence infrastructure.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

use super::BearerToken;

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: User,
    pub token: BearerToken,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a non-admin account and sign the new user in.
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error>;

    /// Check credentials and sign the user in.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Sign a token for `user_id`.
    fn issue_token(&self, user_id: &UserId) -> Result<BearerToken, Error>;

    /// Verify a token and return the user id it encodes.
    fn verify_token(&self, token: &str) -> Result<UserId, Error>;

    /// Verify a token and load the user it names.
    async fn resolve_token(&self, token: &str) -> Result<User, Error>;

    /// Load the stored profile for `user_id`.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;

    /// Make sure an admin account exists for the given email.
    ///
    /// Creates it when absent; an existing account is returned untouched.
    async fn ensure_admin(&self, registration: &Registration) -> Result<User, Error>;
}
