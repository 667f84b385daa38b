//! Backend entry-point: loads settings, wires storage, and serves the REST API.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use travel_backend::inbound::http::health::HealthState;
use travel_backend::outbound::persistence::{DbPool, run_migrations};
use travel_backend::outbound::security::{BuildMode, token_settings_from_process_env};
use travel_backend::server::{
    AppSettings, ServerConfig, bootstrap_admin, build_http_state, create_server,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(|e| {
        std::io::Error::other(format!("invalid bind host {}: {e}", settings.host()))
    })?;
    let token_settings = token_settings_from_process_env(BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let admin = settings
        .admin_registration()
        .map_err(|e| std::io::Error::other(format!("invalid admin settings: {e}")))?;

    let mut config = ServerConfig::new(bind_addr, token_settings, settings.token_ttl())
        .with_error_details(settings.expose_error_details);
    if let Some(pool_config) = settings.pool_config() {
        run_migrations(pool_config.database_url())
            .await
            .map_err(std::io::Error::other)?;
        let pool = DbPool::new(pool_config)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    } else {
        warn!("TRAVEL_DATABASE_URL not set; data lives in memory and is lost on exit");
    }

    let http_state = web::Data::new(build_http_state(&config));
    if let Err(e) = bootstrap_admin(http_state.auth.as_ref(), admin.as_ref()).await {
        error!(error = %e, "admin bootstrap failed");
        return Err(std::io::Error::other(e.to_string()));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, &config)?;
    info!("travel backend started");
    server.await
}
