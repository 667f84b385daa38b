//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http`, the shared
//! schemas, and the bearer token security scheme. Swagger UI serves it at
//! `/docs` in debug builds; `cargo run --bin openapi-dump` prints it.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, TripDetails, User, UserSummary};
use crate::inbound::http::health::Banner;
use crate::inbound::http::trips::{
    BookingResponse, CreatedBy, CreatorSummary, MessageResponse, TripRequest, TripResponse,
};
use crate::inbound::http::users::{
    AuthResponse, LoginRequest, ProfileResponse, RegisterRequest,
};

/// Name of the bearer token security scheme.
pub const BEARER_SCHEME: &str = "bearer";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut scheme = Http::new(HttpAuthScheme::Bearer);
        scheme.bearer_format = Some("JWT".to_owned());
        scheme.description =
            Some("Token returned by POST /api/auth/register or /api/auth/login.".to_owned());
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Travel booking API",
        description = "Accounts, trips, and seat bookings behind bearer token auth."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::profile,
        crate::inbound::http::trips::list_trips,
        crate::inbound::http::trips::get_trip,
        crate::inbound::http::trips::create_trip,
        crate::inbound::http::trips::update_trip,
        crate::inbound::http::trips::delete_trip,
        crate::inbound::http::trips::book_trip,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::health::root,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserSummary,
        RegisterRequest,
        LoginRequest,
        ProfileResponse,
        AuthResponse,
        TripDetails,
        TripRequest,
        TripResponse,
        CreatorSummary,
        CreatedBy,
        MessageResponse,
        BookingResponse,
        Banner,
    )),
    tags(
        (name = "auth", description = "Registration, login, and profile"),
        (name = "trips", description = "Trip catalogue and bookings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
