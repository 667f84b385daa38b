//! Port for signing and verifying bearer tokens.

use std::fmt;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Token signing and verification failures.
    pub enum TokenError {
        /// The token is malformed, tampered with, or signed with another key.
        Invalid { message: String } => "token rejected: {message}",
        /// The token's expiry lies in the past.
        Expired => "token expired",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Signed bearer credential handed to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Issue tokens encoding a user id and verify them back.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token whose subject is `user_id`.
    fn issue(&self, user_id: &UserId) -> Result<BearerToken, TokenError>;

    /// Verify a token and return the user id it encodes.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}
