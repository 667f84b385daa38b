//! Requests shaped the way the browser client sends them.
//!
//! The trip form posts every input as a string and dates as `YYYY-MM-DD`;
//! the client reads identifiers from `_id` and shows server messages as-is.

// Each test crate uses a different subset of the shared helpers.
#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use support::{World, create_trip, login, register, send};
use travel_backend::domain::DEFAULT_TRIP_IMAGE;
use travel_backend::server::build_app;

fn form_payload() -> Value {
    json!({
        "title": "Alpine Escape",
        "destination": "Zermatt",
        "description": "Five days of hiking under the Matterhorn.",
        "price": "1299",
        "duration": "5",
        "startDate": "2026-06-01",
        "endDate": "2026-06-06",
        "maxPeople": "10",
        "image": ""
    })
}

#[rstest]
#[actix_web::test]
async fn form_posted_trips_are_created() {
    let world = World::new().await;
    let app = actix_test::init_service(build_app(world.deps())).await;
    let admin = login(&app, "root@example.com", "correct-horse").await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/trips")
            .set_json(form_payload()),
        Some(&admin),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    assert_eq!(body["price"], 1299.0);
    assert_eq!(body["duration"], 5);
    assert_eq!(body["maxPeople"], 10);
    assert_eq!(body["startDate"], "2026-06-01T00:00:00Z");
    assert_eq!(body["endDate"], "2026-06-06T00:00:00Z");
    assert_eq!(body["image"], DEFAULT_TRIP_IMAGE);
    assert_eq!(body["_id"], body["id"]);
}

#[rstest]
#[case(json!({ "maxPeople": "ten" }), "maxPeople", "invalid")]
#[case(json!({ "startDate": "next week" }), "startDate", "invalid")]
#[case(json!({ "price": "" }), "price", "missing")]
#[actix_web::test]
async fn unusable_form_values_name_the_field(
    #[case] overrides: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let world = World::new().await;
    let app = actix_test::init_service(build_app(world.deps())).await;
    let admin = login(&app, "root@example.com", "correct-horse").await;
    let mut payload = form_payload();
    if let (Some(target), Some(changes)) = (payload.as_object_mut(), overrides.as_object()) {
        target.extend(changes.clone());
    }

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/trips")
            .set_json(payload),
        Some(&admin),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"], json!({ "field": field, "code": code }));
}

#[rstest]
#[actix_web::test]
async fn form_edits_keep_blank_fields() {
    let world = World::new().await;
    let app = actix_test::init_service(build_app(world.deps())).await;
    let admin = login(&app, "root@example.com", "correct-horse").await;
    let id = create_trip(&app, &admin, 3).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/trips/{id}"))
            .set_json(json!({ "price": "899.50", "maxPeople": "", "endDate": "2026-06-08" })),
        Some(&admin),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "update failed: {body}");
    assert_eq!(body["price"], 899.5);
    assert_eq!(body["maxPeople"], 3);
    assert_eq!(body["endDate"], "2026-06-08T00:00:00Z");
}

#[rstest]
#[actix_web::test]
async fn listed_ids_drive_booking() {
    let world = World::new().await;
    let app = actix_test::init_service(build_app(world.deps())).await;
    let admin = login(&app, "root@example.com", "correct-horse").await;
    create_trip(&app, &admin, 1).await;
    let first = register(&app, "Tom", "tom@example.com").await;
    let second = register(&app, "Ann", "ann@example.com").await;

    let (_, listed) = send(&app, actix_test::TestRequest::get().uri("/api/trips"), None).await;
    let id = listed[0]["_id"].as_str().expect("listed _id").to_owned();
    assert_eq!(listed[0]["createdBy"]["_id"], listed[0]["createdBy"]["id"]);
    let uri = format!("/api/trips/{id}/book");

    let (status, booked) = send(&app, actix_test::TestRequest::post().uri(&uri), Some(&first)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booked["message"], "Trip booked successfully");

    let (status, full) = send(&app, actix_test::TestRequest::post().uri(&uri), Some(&second)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(full["message"], "Trip is fully booked");
}

#[rstest]
#[case("/api/auth/profile", None, "Not authorized, no token")]
#[case("/api/auth/profile", Some("not.a.jwt"), "Not authorized, token failed")]
#[case(
    "/api/trips/5b0c9a52-3f7e-4c4f-9a55-1a7f3d2e8b10",
    None,
    "Trip not found"
)]
#[actix_web::test]
async fn messages_read_as_the_client_shows_them(
    #[case] uri: &str,
    #[case] token: Option<&str>,
    #[case] message: &str,
) {
    let world = World::new().await;
    let app = actix_test::init_service(build_app(world.deps())).await;

    let (_, body) = send(&app, actix_test::TestRequest::get().uri(uri), token).await;

    assert_eq!(body["message"], message);
}
