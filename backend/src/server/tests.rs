//! Tests for application assembly and admin bootstrap.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::ports::{MockAuthService, MockTripCommand, MockTripQuery};
use crate::domain::{Registration, TRACE_ID_HEADER};
use crate::inbound::http::test_utils::{admin, state, traveller};

fn deps(trips_query: MockTripQuery, expose_error_details: bool) -> AppDependencies {
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: state(MockAuthService::new(), MockTripCommand::new(), trips_query),
        expose_error_details,
    }
}

fn failing_store() -> MockTripQuery {
    let mut trips_query = MockTripQuery::new();
    trips_query
        .expect_list_trips()
        .returning(|| Err(Error::internal("trip repository error: relation missing")));
    trips_query
}

#[rstest]
#[actix_web::test]
async fn every_response_carries_a_trace_id() {
    let app = actix_test::init_service(build_app(deps(MockTripQuery::new(), false))).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
}

#[rstest]
#[case(false, "Internal server error")]
#[case(true, "trip repository error: relation missing")]
#[actix_web::test]
async fn internal_messages_follow_the_exposure_flag(
    #[case] expose: bool,
    #[case] expected: &str,
) {
    let app = actix_test::init_service(build_app(deps(failing_store(), expose))).await;

    let req = actix_test::TestRequest::get().uri("/api/trips").to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(res).await;

    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], expected);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = actix_test::init_service(build_app(deps(MockTripQuery::new(), false))).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"name\":")
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn cors_allows_cross_origin_reads() {
    let app = actix_test::init_service(build_app(deps(MockTripQuery::new(), false))).await;
    let req = actix_test::TestRequest::get()
        .uri("/")
        .insert_header(("Origin", "http://localhost:5173"))
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("http://localhost:5173")
    );
}

#[rstest]
#[actix_web::test]
async fn unknown_routes_are_not_found() {
    let app = actix_test::init_service(build_app(deps(MockTripQuery::new(), false))).await;

    let req = actix_test::TestRequest::get().uri("/api/unknown").to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

fn registration() -> Registration {
    Registration::try_from_parts("Root", "root@example.com", "correct-horse")
        .expect("valid registration")
}

#[rstest]
#[tokio::test]
async fn bootstrap_is_skipped_without_settings() {
    let mut auth = MockAuthService::new();
    auth.expect_ensure_admin().times(0);

    bootstrap_admin(&auth, None).await.expect("nothing to do");
}

#[rstest]
#[case(admin())]
#[case(traveller())]
#[tokio::test]
async fn bootstrap_accepts_existing_accounts(#[case] existing: crate::domain::User) {
    let mut auth = MockAuthService::new();
    auth.expect_ensure_admin()
        .times(1)
        .withf(|registration| registration.email().as_ref() == "root@example.com")
        .returning(move |_| Ok(existing.clone()));

    bootstrap_admin(&auth, Some(&registration()))
        .await
        .expect("bootstrap succeeds");
}

#[rstest]
#[tokio::test]
async fn bootstrap_propagates_store_failures() {
    let mut auth = MockAuthService::new();
    auth.expect_ensure_admin()
        .returning(|_| Err(Error::service_unavailable("user repository unavailable")));

    let err = bootstrap_admin(&auth, Some(&registration()))
        .await
        .expect_err("store is down");

    assert_eq!(err.code(), crate::domain::ErrorCode::ServiceUnavailable);
}
