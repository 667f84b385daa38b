//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig};
pub use state_builders::{build_http_state, build_http_state_with};

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::AuthService;
use crate::domain::{Error, Registration};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::health::{HealthState, live, ready, root};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::trips::{
    book_trip, create_trip, delete_trip, get_trip, list_trips, update_trip,
};
use crate::inbound::http::users::{login, profile, register};
use crate::middleware::{ErrorDetails, Trace};

/// Shared state handed to every worker's [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub expose_error_details: bool,
}

/// Assemble routes, extractor config, and middleware.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        expose_error_details,
    } = deps;

    let auth = web::scope("/api/auth")
        .service(register)
        .service(login)
        .service(profile);

    let trips = web::scope("/api/trips")
        .service(list_trips)
        .service(create_trip)
        .service(get_trip)
        .service(update_trip)
        .service(delete_trip)
        .service(book_trip);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(auth)
        .service(trips)
        .service(ready)
        .service(live)
        .service(root);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.wrap(ErrorDetails::new(expose_error_details))
        .wrap(Trace)
        .wrap(Cors::permissive())
}

/// Create the configured admin account unless it already exists.
///
/// # Errors
///
/// Propagates store failures from [`AuthService::ensure_admin`].
pub async fn bootstrap_admin(
    auth: &dyn AuthService,
    registration: Option<&Registration>,
) -> Result<(), Error> {
    let Some(registration) = registration else {
        return Ok(());
    };
    let admin = auth.ensure_admin(registration).await?;
    info!(user_id = %admin.id(), is_admin = admin.is_admin(), "bootstrap account ready");
    Ok(())
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The returned [`Server`] must be awaited to drive the listener.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        expose_error_details: config.expose_error_details,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "server listening");
    Ok(server)
}

#[cfg(test)]
mod tests;
