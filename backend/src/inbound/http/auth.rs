//! Bearer token extraction and the access guard extractors.
//!
//! Handlers declare the access level they need by taking [`Authenticated`]
//! or [`AdminUser`] as an argument; the extractor resolves
//! the `Authorization` header through the [`AuthService`] port before the
//! handler body runs.
//!
//! [`AuthService`]: crate::domain::ports::AuthService

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Caller, Capability, Error, NO_TOKEN_MESSAGE, User, authorize};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Return the token carried by an `Authorization: Bearer <token>` header.
///
/// Missing headers, other schemes, and blank tokens all yield `None`.
///
/// # Examples
/// ```
/// use actix_web::test::TestRequest;
/// use travel_backend::inbound::http::auth::bearer_token;
///
/// let req = TestRequest::default()
///     .insert_header(("Authorization", "Bearer abc.def.ghi"))
///     .to_http_request();
/// assert_eq!(bearer_token(&req), Some("abc.def.ghi"));
/// ```
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))
}

/// Resolve the request's bearer token into a user.
///
/// `Ok(None)` means no token was presented.
fn resolve_caller(req: &HttpRequest) -> LocalBoxFuture<'static, Result<Option<User>, Error>> {
    let token = bearer_token(req).map(str::to_owned);
    let state = http_state(req);
    Box::pin(async move {
        let Some(token) = token else {
            return Ok(None);
        };
        let user = state?.auth.resolve_token(&token).await?;
        Ok(Some(user))
    })
}

/// The authenticated user behind the request.
///
/// Rejects requests without a bearer token with `401 not authorized, no
/// token` and those with an unusable token with `401 not authorized, token
/// failed`.
#[derive(Debug, Clone)]
pub struct Authenticated(pub User);

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolved = resolve_caller(req);
        Box::pin(async move {
            match resolved.await? {
                Some(user) => Ok(Self(user)),
                None => {
                    debug!("request rejected: no bearer token");
                    Err(Error::unauthorized(NO_TOKEN_MESSAGE))
                }
            }
        })
    }
}

/// An authenticated user holding the admin role.
///
/// Authentication runs first, so a missing token is still a 401; a verified
/// non-admin caller is a 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let authenticated = Authenticated::from_request(req, payload);
        Box::pin(async move {
            let Authenticated(user) = authenticated.await?;
            authorize(&Caller::User(user.clone()), Capability::Admin)?;
            Ok(Self(user))
        })
    }
}

impl From<AdminUser> for Caller {
    fn from(value: AdminUser) -> Self {
        Caller::User(value.0)
    }
}

impl From<Authenticated> for Caller {
    fn from(value: Authenticated) -> Self {
        Caller::User(value.0)
    }
}
