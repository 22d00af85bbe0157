//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables carry the `STAYLINK` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use staylink::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod auth;
mod commission;
mod database;
mod error;
mod server;
mod session;

pub use auth::AuthConfig;
pub use commission::CommissionConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;

use crate::adapters::http::{ApiOptions, ServiceSettings};

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bind address, environment, logging, CORS
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection pool
    pub database: DatabaseConfig,

    /// Hosted auth service and token validation
    pub auth: AuthConfig,

    /// Referral and platform rates
    #[serde(default)]
    pub commission: CommissionConfig,

    /// Status polling and contact link defaults
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `STAYLINK` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `STAYLINK__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `STAYLINK__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    /// - `STAYLINK__COMMISSION__REFERRAL_RATE_SOURCE=agent`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STAYLINK")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.commission.validate()?;
        self.session.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Settings the workflow handlers run with.
    pub fn service_settings(&self) -> Result<ServiceSettings, ValidationError> {
        Ok(ServiceSettings {
            commission: self.commission.policy()?,
            status_poll_interval: self.session.status_poll_interval(),
            default_country_code: self
                .session
                .default_country_code
                .trim_start_matches('+')
                .to_string(),
        })
    }

    pub fn api_options(&self) -> ApiOptions {
        ApiOptions {
            request_timeout: self.server.request_timeout(),
            cors_origins: self.server.cors_origins_list(),
        }
    }
}
