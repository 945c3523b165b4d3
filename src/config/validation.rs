//! Configuration validation.
//!
//! This module provides validation logic for configuration values,
//! ensuring they are within acceptable ranges.

use super::Config;
use crate::error::ConfigError;

/// Maximum allowed export time-to-live (30 days).
pub const MAX_EXPORT_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Maximum allowed per-player quota.
pub const MAX_EXPORTS_PER_PLAYER_LIMIT: u32 = 100;

/// Maximum allowed id generation attempts.
pub const MAX_ID_GENERATION_ATTEMPTS: u32 = 10;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `DATABASE_PATH` must not be empty
/// - `EXPORT_TTL_SECS` must be between 1 and 2592000
/// - `MAX_EXPORTS_PER_PLAYER` must be between 1 and 100
/// - `ID_GENERATION_ATTEMPTS` must be between 1 and 10
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "DATABASE_PATH".into(),
            reason: "must not be empty".into(),
        });
    }

    if config.export_ttl_secs == 0 || config.export_ttl_secs > MAX_EXPORT_TTL_SECS {
        return Err(ConfigError::InvalidValue {
            var: "EXPORT_TTL_SECS".into(),
            reason: format!("must be between 1 and {MAX_EXPORT_TTL_SECS} seconds"),
        });
    }

    if config.max_exports_per_player == 0
        || config.max_exports_per_player > MAX_EXPORTS_PER_PLAYER_LIMIT
    {
        return Err(ConfigError::InvalidValue {
            var: "MAX_EXPORTS_PER_PLAYER".into(),
            reason: format!("must be between 1 and {MAX_EXPORTS_PER_PLAYER_LIMIT}"),
        });
    }

    if config.id_generation_attempts == 0
        || config.id_generation_attempts > MAX_ID_GENERATION_ATTEMPTS
    {
        return Err(ConfigError::InvalidValue {
            var: "ID_GENERATION_ATTEMPTS".into(),
            reason: format!("must be between 1 and {MAX_ID_GENERATION_ATTEMPTS}"),
        });
    }

    Ok(())
}
