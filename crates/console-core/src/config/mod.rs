//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from an
//! optional TOML file overlaid by `CONSOLE__*` environment variables. Each
//! sub-module represents a logical configuration section.

pub mod api;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::api::ApiConfig;
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// REST backend settings.
    pub api: ApiConfig,
    /// Session renewal settings.
    pub session: SessionConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional; every field has a default. Environment
    /// variables prefixed with `CONSOLE` and separated by `__` override the
    /// file, e.g. `CONSOLE__API__BASE_URL`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("CONSOLE")
                    .prefix_separator("__")
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
