//! Process settings and the HTTP server configuration object.

use std::net::{AddrParseError, IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{CredentialValidationError, Registration};
use crate::outbound::persistence::{DbPool, PoolConfig};
use crate::outbound::security::TokenSettings;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;
const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Settings loaded from CLI flags and `TRAVEL_*` environment variables.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRAVEL")]
pub struct AppSettings {
    /// IP address to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled PostgreSQL connections.
    pub db_max_connections: Option<u32>,
    /// Lifetime of issued bearer tokens, in seconds.
    pub token_ttl_seconds: Option<i64>,
    /// Return internal error messages and details to clients.
    #[ortho_config(default = false)]
    pub expose_error_details: bool,
    /// Display name of the bootstrap admin.
    pub admin_name: Option<String>,
    /// Email of the bootstrap admin.
    pub admin_email: Option<String>,
    /// Password of the bootstrap admin.
    pub admin_password: Option<String>,
}

impl AppSettings {
    /// Configured host, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Configured port, falling back to 5000.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Socket address built from [`Self::host`] and [`Self::port`].
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the host is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host().parse()?;
        Ok(SocketAddr::new(ip, self.port()))
    }

    /// Pool settings when a database URL is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let config = PoolConfig::new(url);
        Some(match self.db_max_connections {
            Some(size) => config.with_max_size(size),
            None => config,
        })
    }

    /// Bearer token lifetime, 30 days unless overridden.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS))
    }

    /// Registration for the bootstrap admin.
    ///
    /// `Ok(None)` unless both the admin email and password are set.
    ///
    /// # Errors
    ///
    /// Returns the validation failure when the configured values are unusable.
    pub fn admin_registration(&self) -> Result<Option<Registration>, CredentialValidationError> {
        let (Some(email), Some(password)) = (&self.admin_email, &self.admin_password) else {
            return Ok(None);
        };
        let name = self.admin_name.as_deref().unwrap_or(DEFAULT_ADMIN_NAME);
        Registration::try_from_parts(name, email, password).map(Some)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_settings: TokenSettings,
    pub(crate) token_ttl: chrono::Duration,
    pub(crate) expose_error_details: bool,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration with the in-memory store.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        token_settings: TokenSettings,
        token_ttl: chrono::Duration,
    ) -> Self {
        Self {
            bind_addr,
            token_settings,
            token_ttl,
            expose_error_details: false,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return internal error messages to clients.
    #[must_use]
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
