//! Trip API handlers.
//!
//! ```text
//! GET /api/trips
//! GET /api/trips/{id}
//! POST /api/trips {"title":"Alpine Escape",...}
//! PUT /api/trips/{id} {"price":0}
//! DELETE /api/trips/{id}
//! POST /api/trips/{id}/book
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::TripListing;
use crate::domain::{
    Caller, Error, TRIP_NOT_FOUND_MESSAGE, Trip, TripDetails, TripField, TripId, TripInput,
    TripValidationError, UserSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, Authenticated};
use crate::inbound::http::state::HttpState;

/// Message returned after a successful delete.
pub const TRIP_REMOVED_MESSAGE: &str = "Trip removed";
/// Message returned after a successful booking.
pub const TRIP_BOOKED_MESSAGE: &str = "Trip booked successfully";

mod form;

pub use form::{FormValue, FromFormText};

/// Trip fields for create and update.
///
/// On create every field except `image` is required. On update a field that
/// is present (and not `null`) replaces the stored value. Numbers may be sent
/// as numeric strings and dates as `YYYY-MM-DD`, as HTML forms post them.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    #[schema(example = "Alpine Escape")]
    pub title: Option<String>,
    #[schema(example = "Zermatt")]
    pub destination: Option<String>,
    #[schema(example = "Five days of hiking under the Matterhorn.")]
    pub description: Option<String>,
    #[schema(value_type = Option<f64>, example = 1299.0)]
    pub price: Option<FormValue<f64>>,
    #[schema(value_type = Option<i32>, example = 5)]
    pub duration: Option<FormValue<i32>>,
    #[schema(value_type = Option<String>, example = "2026-06-01")]
    pub start_date: Option<FormValue<DateTime<Utc>>>,
    #[schema(value_type = Option<String>, example = "2026-06-06T09:00:00Z")]
    pub end_date: Option<FormValue<DateTime<Utc>>>,
    #[schema(value_type = Option<i32>, example = 12)]
    pub max_people: Option<FormValue<i32>>,
    pub image: Option<String>,
}

impl TryFrom<TripRequest> for TripInput {
    type Error = TripValidationError;

    fn try_from(value: TripRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title,
            destination: value.destination,
            description: value.description,
            price: form::read(value.price, TripField::Price)?,
            duration: form::read(value.duration, TripField::Duration)?,
            start_date: form::read(value.start_date, TripField::StartDate)?,
            end_date: form::read(value.end_date, TripField::EndDate)?,
            max_people: form::read(value.max_people, TripField::MaxPeople)?,
            image: value.image,
        })
    }
}

/// Expanded creator, keyed by both `id` and `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CreatorSummary {
    #[serde(rename = "_id")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub document_id: String,
    #[serde(flatten)]
    pub user: UserSummary,
}

impl From<UserSummary> for CreatorSummary {
    fn from(user: UserSummary) -> Self {
        Self {
            document_id: user.id.to_string(),
            user,
        }
    }
}

/// Creator reference on a trip body.
///
/// Reads expand the creator; mutations return only the creator's id.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CreatedBy {
    User(CreatorSummary),
    Id(String),
}

/// Trip representation returned by every trip endpoint.
///
/// The identifier is emitted as both `id` and `_id`; browser clients written
/// against a document store read `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    #[schema(value_type = String, example = "0f8e2f4a-7a7f-4c55-9d8b-1d2f3c4b5a69")]
    pub id: String,
    #[serde(rename = "_id")]
    #[schema(value_type = String, example = "0f8e2f4a-7a7f-4c55-9d8b-1d2f3c4b5a69")]
    pub document_id: String,
    #[serde(flatten)]
    pub details: TripDetails,
    #[schema(example = 3)]
    pub current_bookings: i32,
    /// `null` when the creating account no longer exists.
    pub created_by: Option<CreatedBy>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TripResponse {
    fn with_creator(trip: Trip, created_by: Option<CreatedBy>) -> Self {
        let id = trip.id().to_string();
        Self {
            document_id: id.clone(),
            id,
            current_bookings: trip.current_bookings(),
            created_at: trip.created_at(),
            updated_at: trip.updated_at(),
            details: trip.details().clone(),
            created_by,
        }
    }
}

impl From<TripListing> for TripResponse {
    fn from(value: TripListing) -> Self {
        Self::with_creator(
            value.trip,
            value
                .creator
                .map(|creator| CreatedBy::User(CreatorSummary::from(creator))),
        )
    }
}

impl From<Trip> for TripResponse {
    fn from(value: Trip) -> Self {
        let creator = CreatedBy::Id(value.created_by().to_string());
        Self::with_creator(value, Some(creator))
    }
}

/// Body of `DELETE /api/trips/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Trip removed")]
    pub message: String,
}

/// Body of `POST /api/trips/{id}/book`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    #[schema(example = "Trip booked successfully")]
    pub message: String,
    pub trip: TripResponse,
}

/// Parse a path id; anything that is not a UUID cannot name a trip.
fn trip_id(raw: &str) -> Result<TripId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(TRIP_NOT_FOUND_MESSAGE))
}

/// List every trip with its creator expanded.
#[utoipa::path(
    get,
    path = "/api/trips",
    responses(
        (status = 200, description = "Trips in store order", body = [TripResponse]),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["trips"],
    operation_id = "listTrips",
    security([])
)]
#[get("")]
pub async fn list_trips(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TripResponse>>> {
    let listings = state.trips_query.list_trips().await?;
    Ok(web::Json(
        listings.into_iter().map(TripResponse::from).collect(),
    ))
}

/// Fetch one trip with its creator expanded.
#[utoipa::path(
    get,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Trip", body = TripResponse),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "getTrip",
    security([])
)]
#[get("/{id}")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TripResponse>> {
    let id = trip_id(&path)?;
    let listing = state.trips_query.get_trip(&id).await?;
    Ok(web::Json(TripResponse::from(listing)))
}

/// Create a trip owned by the calling admin.
#[utoipa::path(
    post,
    path = "/api/trips",
    request_body = TripRequest,
    responses(
        (status = 201, description = "Trip created", body = TripResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["trips"],
    operation_id = "createTrip",
    security(("bearer" = []))
)]
#[post("")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    admin: AdminUser,
    payload: web::Json<TripRequest>,
) -> ApiResult<HttpResponse> {
    let input = TripInput::try_from(payload.into_inner())?;
    let caller = Caller::from(admin);
    let trip = state.trips.create_trip(&caller, input).await?;
    Ok(HttpResponse::Created().json(TripResponse::from(trip)))
}

/// Merge the supplied fields into a trip.
#[utoipa::path(
    put,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip identifier")),
    request_body = TripRequest,
    responses(
        (status = 200, description = "Trip updated", body = TripResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "updateTrip",
    security(("bearer" = []))
)]
#[put("/{id}")]
pub async fn update_trip(
    state: web::Data<HttpState>,
    admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<TripRequest>,
) -> ApiResult<web::Json<TripResponse>> {
    let id = trip_id(&path)?;
    let patch = TripInput::try_from(payload.into_inner())?;
    let caller = Caller::from(admin);
    let trip = state.trips.update_trip(&caller, &id, patch).await?;
    Ok(web::Json(TripResponse::from(trip)))
}

/// Remove a trip, bookings included.
#[utoipa::path(
    delete,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Trip removed", body = MessageResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "deleteTrip",
    security(("bearer" = []))
)]
#[delete("/{id}")]
pub async fn delete_trip(
    state: web::Data<HttpState>,
    admin: AdminUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = trip_id(&path)?;
    state.trips.delete_trip(&Caller::from(admin), &id).await?;
    Ok(web::Json(MessageResponse {
        message: TRIP_REMOVED_MESSAGE.to_owned(),
    }))
}

/// Take one seat on a trip.
#[utoipa::path(
    post,
    path = "/api/trips/{id}/book",
    params(("id" = String, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Seat booked", body = BookingResponse),
        (status = 400, description = "Trip is fully booked", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "bookTrip",
    security(("bearer" = []))
)]
#[post("/{id}/book")]
pub async fn book_trip(
    state: web::Data<HttpState>,
    user: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookingResponse>> {
    let id = trip_id(&path)?;
    let trip = state.trips.book_trip(&Caller::from(user), &id).await?;
    Ok(web::Json(BookingResponse {
        message: TRIP_BOOKED_MESSAGE.to_owned(),
        trip: TripResponse::from(trip),
    }))
}
