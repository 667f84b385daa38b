//! Capability checks for resolved callers.
//!
//! Transport adapters resolve credentials into a [`Caller`]; this module
//! decides whether that caller may exercise a [`Capability`].

use super::{Error, User};

/// Message returned when a request carries no usable bearer token.
pub const NO_TOKEN_MESSAGE: &str = "Not authorized, no token";
/// Message returned when a bearer token cannot be verified or resolved.
pub const TOKEN_FAILED_MESSAGE: &str = "Not authorized, token failed";
/// Message returned when an authenticated caller lacks the admin role.
pub const NOT_ADMIN_MESSAGE: &str = "Not authorized as admin";

/// Closed set of access levels an operation can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Open to everyone.
    Anonymous,
    /// Requires a verified user.
    Authenticated,
    /// Requires a verified user holding the admin role.
    Admin,
}

/// Identity of the party making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(User),
}

impl Caller {
    /// The resolved user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user),
        }
    }
}

/// Decide whether `caller` holds `capability`.
///
/// Anonymous callers asking for [`Capability::Authenticated`] are
/// unauthorized; any caller that is not an admin asking for
/// [`Capability::Admin`] is forbidden.
///
/// # Examples
/// ```
/// use travel_backend::domain::{authorize, Caller, Capability, ErrorCode};
///
/// assert!(authorize(&Caller::Anonymous, Capability::Anonymous).is_ok());
/// let err = authorize(&Caller::Anonymous, Capability::Authenticated).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Unauthorized);
/// ```
pub fn authorize(caller: &Caller, capability: Capability) -> Result<(), Error> {
    match (capability, caller) {
        (Capability::Anonymous, _) => Ok(()),
        (Capability::Authenticated, Caller::User(_)) => Ok(()),
        (Capability::Authenticated, Caller::Anonymous) => {
            Err(Error::unauthorized(NO_TOKEN_MESSAGE))
        }
        (Capability::Admin, Caller::User(user)) if user.is_admin() => Ok(()),
        (Capability::Admin, _) => Err(Error::forbidden(NOT_ADMIN_MESSAGE)),
    }
}
