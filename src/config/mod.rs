//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Configuration validation
//! - Default value handling
//!
//! # Example
//!
//! ```
//! use model_export_store::config::{Config, DEFAULT_EXPORT_TTL_SECS};
//!
//! // Create a config directly (use Config::from_env() in production)
//! let config = Config {
//!     database_path: "./data/exports.db".to_string(),
//!     log_level: "info".to_string(),
//!     export_ttl_secs: DEFAULT_EXPORT_TTL_SECS,
//!     max_exports_per_player: 5,
//!     id_generation_attempts: 3,
//! };
//!
//! assert_eq!(config.export_ttl().num_hours(), 24);
//! ```

mod validation;

pub use validation::{
    validate_config, MAX_EXPORTS_PER_PLAYER_LIMIT, MAX_EXPORT_TTL_SECS, MAX_ID_GENERATION_ATTEMPTS,
};

use chrono::Duration;

use crate::error::ConfigError;

/// Default database path.
pub const DEFAULT_DATABASE_PATH: &str = "./data/exports.db";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default export time-to-live (24 hours).
pub const DEFAULT_EXPORT_TTL_SECS: u64 = 24 * 60 * 60;

/// Default number of stored exports a single player may hold.
pub const DEFAULT_MAX_EXPORTS_PER_PLAYER: u32 = 5;

/// Default number of draws when generating an export id.
pub const DEFAULT_ID_GENERATION_ATTEMPTS: u32 = 3;

/// Application configuration.
///
/// Use [`Config::from_env`] to load configuration from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Database path.
    pub database_path: String,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
    /// Seconds after creation at which an export expires.
    pub export_ttl_secs: u64,
    /// Maximum stored exports per player.
    pub max_exports_per_player: u32,
    /// How many ids to draw before giving up on a collision.
    pub id_generation_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            export_ttl_secs: DEFAULT_EXPORT_TTL_SECS,
            max_exports_per_player: DEFAULT_MAX_EXPORTS_PER_PLAYER,
            id_generation_attempts: DEFAULT_ID_GENERATION_ATTEMPTS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `DATABASE_PATH`: Path to `SQLite` database (default: `./data/exports.db`)
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    /// - `EXPORT_TTL_SECS`: Export time-to-live (default: `86400`)
    /// - `MAX_EXPORTS_PER_PLAYER`: Per-player quota (default: `5`)
    /// - `ID_GENERATION_ATTEMPTS`: Id draws on collision (default: `3`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable does not parse or any
    /// value fails validation (see [`validate_config`]).
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.into());

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let export_ttl_secs = parse_env_u64("EXPORT_TTL_SECS", DEFAULT_EXPORT_TTL_SECS)?;
        let max_exports_per_player =
            parse_env_u32("MAX_EXPORTS_PER_PLAYER", DEFAULT_MAX_EXPORTS_PER_PLAYER)?;
        let id_generation_attempts =
            parse_env_u32("ID_GENERATION_ATTEMPTS", DEFAULT_ID_GENERATION_ATTEMPTS)?;

        let config = Self {
            database_path,
            log_level,
            export_ttl_secs,
            max_exports_per_player,
            id_generation_attempts,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Export time-to-live as a [`Duration`].
    #[must_use]
    pub fn export_ttl(&self) -> Duration {
        // Validation caps the TTL far below i64::MAX seconds.
        Duration::seconds(i64::try_from(self.export_ttl_secs).unwrap_or(i64::MAX / 1000))
    }
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}

/// Parse an environment variable as u32, using a default if not set.
fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}
