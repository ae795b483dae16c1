//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod cache;
pub mod logging;
pub mod rate_limit;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::cache::CacheConfig;
pub use self::logging::LoggingConfig;
pub use self::rate_limit::{RateLimitConfig, RateLimitRule};
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session management settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Per-class rate limiter settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `SENTRA`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SENTRA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            session: SessionConfig::default(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
