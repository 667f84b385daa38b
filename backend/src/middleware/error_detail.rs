//! Optional disclosure of internal error details.
//!
//! [`Error`](crate::domain::Error) responses redact internal failures to a
//! generic message. When `expose_error_details` is enabled (local debugging
//! only) this middleware swaps the redacted body for the original message and
//! details.

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::{Error as DomainError, ErrorCode, TRACE_ID_HEADER};

/// Middleware restoring internal error messages when enabled.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use travel_backend::middleware::ErrorDetails;
///
/// let app = App::new().wrap(ErrorDetails::new(cfg!(debug_assertions)));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ErrorDetails {
    expose: bool,
}

impl ErrorDetails {
    pub fn new(expose: bool) -> Self {
        Self { expose }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorDetails
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorDetailsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorDetailsMiddleware {
            service,
            expose: self.expose,
        }))
    }
}

/// Service wrapper produced by [`ErrorDetails`].
pub struct ErrorDetailsMiddleware<S> {
    service: S,
    expose: bool,
}

fn detailed_response(res: &ServiceResponse<impl Sized>) -> Option<HttpResponse> {
    let error = res.response().error()?.as_error::<DomainError>()?;
    if error.code() != ErrorCode::InternalError {
        return None;
    }
    let mut builder = HttpResponse::build(res.status());
    if let Some(id) = error.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    Some(builder.json(error))
}

impl<S, B> Service<ServiceRequest> for ErrorDetailsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let expose = self.expose;
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            if !expose {
                return Ok(res.map_into_left_body());
            }
            match detailed_response(&res) {
                Some(detailed) => {
                    let (req, _) = res.into_parts();
                    Ok(ServiceResponse::new(req, detailed).map_into_right_body())
                }
                None => Ok(res.map_into_left_body()),
            }
        })
    }
}
