//! Account domain service.
//!
//! Implements the [`AuthService`] driving port on top of the user repository,
//! a password hasher, and a token issuer.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AuthService, AuthSession, BearerToken, CredentialHasher, CredentialHasherError, TokenError,
    TokenIssuer, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, Registration, TOKEN_FAILED_MESSAGE, User, UserAccount, UserId,
};

/// Message returned for unknown emails and wrong passwords alike.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";
/// Message returned when registering an email that is already in use.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "User already exists";

pub(crate) fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE)
            .with_details(json!({ "field": "email", "code": "taken" })),
    }
}

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
        rejected => {
            debug!(reason = %rejected, "bearer token rejected");
            Error::unauthorized(TOKEN_FAILED_MESSAGE)
        }
    }
}

/// Account service implementing the authentication driving port.
#[derive(Clone)]
pub struct AccountService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> AccountService<U, H, T> {
    /// Create a new service from its collaborators.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H, T> AccountService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher,
    T: TokenIssuer,
{
    async fn create_account(
        &self,
        registration: &Registration,
        is_admin: bool,
    ) -> Result<User, Error> {
        let password = self
            .hasher
            .hash(registration.password())
            .map_err(map_hasher_error)?;
        let user = User::new(
            UserId::random(),
            registration.name().clone(),
            registration.email().clone(),
            is_admin,
            self.clock.utc(),
        );
        let account = UserAccount {
            user: user.clone(),
            password,
        };
        self.users
            .insert(&account)
            .await
            .map_err(map_user_repository_error)?;
        Ok(user)
    }

    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.issue_token(user.id())?;
        Ok(AuthSession { user, token })
    }
}

#[async_trait]
impl<U, H, T> AuthService for AccountService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher,
    T: TokenIssuer,
{
    async fn register(&self, registration: &Registration) -> Result<AuthSession, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict(DUPLICATE_EMAIL_MESSAGE)
                .with_details(json!({ "field": "email", "code": "taken" })));
        }

        let user = self.create_account(registration, false).await?;
        info!(user_id = %user.id(), "user registered");
        self.session_for(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let account = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS_MESSAGE))?;

        let matches = self
            .hasher
            .verify(credentials.password(), &account.password)
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }

        debug!(user_id = %account.user.id(), "user logged in");
        self.session_for(account.user)
    }

    fn issue_token(&self, user_id: &UserId) -> Result<BearerToken, Error> {
        self.tokens.issue(user_id).map_err(map_token_error)
    }

    fn verify_token(&self, token: &str) -> Result<UserId, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }

    async fn resolve_token(&self, token: &str) -> Result<User, Error> {
        let user_id = self.verify_token(token)?;
        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| {
                debug!(user_id = %user_id, "token names a missing user");
                Error::unauthorized(TOKEN_FAILED_MESSAGE)
            })
    }

    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn ensure_admin(&self, registration: &Registration) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_email(registration.email())
            .await
            .map_err(map_user_repository_error)?;
        if let Some(account) = existing {
            if !account.user.is_admin() {
                warn!(
                    email = %registration.email(),
                    "bootstrap admin email belongs to a non-admin account; leaving it unchanged"
                );
            }
            return Ok(account.user);
        }

        let user = self.create_account(registration, true).await?;
        info!(user_id = %user.id(), email = %user.email(), "bootstrap admin created");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
