//! Shared harness for integration tests over the in-memory adapters.
//!
//! Integration tests compile as separate crates under `backend/tests/`; each
//! pulls this module in with `mod support;`.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use travel_backend::domain::Registration;
use travel_backend::inbound::http::health::HealthState;
use travel_backend::inbound::http::state::HttpState;
use travel_backend::outbound::memory::{MemoryTripRepository, MemoryUserRepository};
use travel_backend::outbound::security::JwtTokenIssuer;
use travel_backend::server::{AppDependencies, bootstrap_admin, build_http_state_with};
use travel_backend::test_support::MutableClock;

/// Lifetime of tokens issued by the harness.
pub const TOKEN_TTL_SECONDS: i64 = 3600;

const SECRET: &[u8] = b"integration-test-secret-of-32-bytes!";

/// Wired state plus the clock that drives token expiry.
pub struct World {
    pub http_state: web::Data<HttpState>,
    pub clock: Arc<MutableClock>,
}

impl World {
    /// Fresh in-memory stores with a bootstrap admin `root@example.com`.
    pub async fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid start");
        let clock = Arc::new(MutableClock::new(start));
        let tokens = JwtTokenIssuer::new(
            SECRET,
            chrono::Duration::seconds(TOKEN_TTL_SECONDS),
            clock.clone(),
        );
        let state = build_http_state_with(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemoryTripRepository::new()),
            tokens,
            clock.clone(),
        );
        let admin = Registration::try_from_parts("Root", "root@example.com", "correct-horse")
            .expect("valid admin registration");
        bootstrap_admin(state.auth.as_ref(), Some(&admin))
            .await
            .expect("admin bootstrap");

        Self {
            http_state: web::Data::new(state),
            clock,
        }
    }

    /// Dependencies for [`travel_backend::server::build_app`].
    pub fn deps(&self) -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: self.http_state.clone(),
            expose_error_details: false,
        }
    }
}

/// Send a request and decode the JSON body.
pub async fn send<S, B>(
    app: &S,
    req: actix_test::TestRequest,
    token: Option<&str>,
) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {token}"))),
        None => req,
    };
    let res = actix_test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

/// Log in and return the bearer token.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": password })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token").to_owned()
}

/// Register a traveller and return the bearer token.
pub async fn register<S, B>(app: &S, name: &str, email: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": name, "email": email, "password": "secret1" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["token"].as_str().expect("token").to_owned()
}

/// A valid create payload with the given capacity.
pub fn trip_payload(max_people: i32) -> Value {
    json!({
        "title": "Alpine Escape",
        "destination": "Zermatt",
        "description": "Five days of hiking under the Matterhorn.",
        "price": 1299.0,
        "duration": 5,
        "startDate": "2026-06-01T09:00:00Z",
        "endDate": "2026-06-06T09:00:00Z",
        "maxPeople": max_people
    })
}

/// Create a trip as `admin_token` and return its id.
pub async fn create_trip<S, B>(app: &S, admin_token: &str, max_people: i32) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/trips")
            .set_json(trip_payload(max_people)),
        Some(admin_token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_str().expect("trip id").to_owned()
}
