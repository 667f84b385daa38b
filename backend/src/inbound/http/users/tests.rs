//! Tests for the account handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{BearerToken, MockAuthService, MockTripCommand, MockTripQuery};
use crate::domain::{DUPLICATE_EMAIL_MESSAGE, INVALID_CREDENTIALS_MESSAGE};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::test_utils::{TRAVELLER_TOKEN, bearer, resolving_auth, state, traveller};

fn test_app(
    auth: MockAuthService,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state(auth, MockTripCommand::new(), MockTripQuery::new()))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api/auth")
                .service(register)
                .service(login)
                .service(profile),
        )
}

async fn post_json(auth: MockAuthService, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(auth)).await;
    let req = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    let status = res.status();
    (status, actix_test::read_body_json(res).await)
}

fn session() -> AuthSession {
    AuthSession {
        user: traveller(),
        token: BearerToken::new("signed.jwt.token"),
    }
}

#[rstest]
#[actix_web::test]
async fn register_returns_profile_and_token() {
    let mut auth = MockAuthService::new();
    auth.expect_register()
        .times(1)
        .withf(|registration| registration.email().as_ref() == "tom@example.com")
        .returning(|_| Ok(session()));

    let (status, body) = post_json(
        auth,
        "/api/auth/register",
        json!({ "name": "Tom Traveller", "email": " TOM@example.com ", "password": "secret1" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["token"], "signed.jwt.token");
    assert_eq!(body["_id"], "22222222-2222-4222-8222-222222222222");
    assert_eq!(body["_id"], body["id"]);
    assert_eq!(body["email"], "tom@example.com");
    assert_eq!(body["isAdmin"], false);
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[rstest]
#[case(json!({ "email": "tom@example.com", "password": "secret1" }), "name", "missing")]
#[case(json!({ "name": "Tom", "password": "secret1" }), "email", "missing")]
#[case(json!({ "name": "Tom", "email": "tom@", "password": "secret1" }), "email", "invalid")]
#[case(json!({ "name": "Tom", "email": "tom@example.com" }), "password", "missing")]
#[case(json!({ "name": "Tom", "email": "tom@example.com", "password": "abc" }), "password", "too_short")]
#[actix_web::test]
async fn register_reports_the_first_invalid_field(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut auth = MockAuthService::new();
    auth.expect_register().times(0);

    let (status, body) = post_json(auth, "/api/auth/register", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn register_surfaces_duplicate_emails_as_conflict() {
    let mut auth = MockAuthService::new();
    auth.expect_register()
        .returning(|_| Err(Error::conflict(DUPLICATE_EMAIL_MESSAGE)));

    let (status, body) = post_json(
        auth,
        "/api/auth/register",
        json!({ "name": "Tom", "email": "tom@example.com", "password": "secret1" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], DUPLICATE_EMAIL_MESSAGE);
}

#[rstest]
#[actix_web::test]
async fn malformed_bodies_are_invalid_requests() {
    let app = actix_test::init_service(test_app(MockAuthService::new())).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ not json")
        .to_request();

    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn login_returns_token() {
    let mut auth = MockAuthService::new();
    auth.expect_login()
        .withf(|credentials| credentials.password() == "secret1")
        .returning(|_| Ok(session()));

    let (status, body) = post_json(
        auth,
        "/api/auth/login",
        json!({ "email": "tom@example.com", "password": "secret1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "signed.jwt.token");
    assert_eq!(body["name"], "Tom Traveller");
}

#[rstest]
#[actix_web::test]
async fn login_rejects_bad_credentials() {
    let mut auth = MockAuthService::new();
    auth.expect_login()
        .returning(|_| Err(Error::unauthorized(INVALID_CREDENTIALS_MESSAGE)));

    let (status, body) = post_json(
        auth,
        "/api/auth/login",
        json!({ "email": "tom@example.com", "password": "wrong-password" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], INVALID_CREDENTIALS_MESSAGE);
}

#[rstest]
#[actix_web::test]
async fn profile_requires_a_token() {
    let app = actix_test::init_service(test_app(resolving_auth())).await;
    let req = actix_test::TestRequest::get()
        .uri("/api/auth/profile")
        .to_request();

    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn profile_returns_the_stored_user() {
    let mut auth = resolving_auth();
    let expected = traveller();
    auth.expect_profile()
        .withf(move |id| id == expected.id())
        .returning(|_| Ok(traveller()));
    let app = actix_test::init_service(test_app(auth)).await;
    let req = actix_test::TestRequest::get()
        .uri("/api/auth/profile")
        .insert_header(bearer(TRAVELLER_TOKEN))
        .to_request();

    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["id"], "22222222-2222-4222-8222-222222222222");
    assert_eq!(body["_id"], body["id"]);
    assert_eq!(body["isAdmin"], false);
}
