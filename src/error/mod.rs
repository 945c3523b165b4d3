//! Error types for the model export store.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`ExportError`]: Export lifecycle errors reported to callers
//! - [`StorageError`]: Database operation errors
//! - [`McpError`]: MCP protocol errors
//! - [`ConfigError`]: Configuration errors
//!
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

/// Code reported for malformed input.
pub const CODE_INVALID_ARGUMENT: u32 = 400;

/// Code reported when a player already holds the maximum number of exports.
pub const CODE_QUOTA_EXCEEDED: u32 = 4001;

/// Code reported when an export id is already taken.
pub const CODE_DUPLICATE_ID: u32 = 4002;

/// Code reported when no export matches the request.
pub const CODE_NOT_FOUND: u32 = 4041;

/// Code reported for unanticipated failures.
pub const CODE_INTERNAL: u32 = 7000;

/// Message reported for unanticipated failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Top-level application error.
///
/// This is the main error type returned by public API functions.
/// It wraps all subsystem errors for unified error handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Export lifecycle error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// MCP protocol error.
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Export lifecycle errors.
///
/// Every variant except [`ExportError::Storage`] is an anticipated failure
/// whose message is safe to hand back to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Malformed input: bad id pattern, non-positive player id, empty payload.
    #[error("{message}")]
    InvalidArgument {
        /// Description of what's invalid.
        message: String,
    },

    /// The player already holds the maximum number of exports.
    #[error("Player cannot have more than {limit} model exports")]
    QuotaExceeded {
        /// The per-player export limit.
        limit: u32,
    },

    /// An export with this id already exists.
    #[error("Model with this ID already exists")]
    DuplicateId {
        /// The colliding id.
        id: String,
    },

    /// No export matches the id (and owner, when one was given).
    #[error("{}", not_found_message(.owner_checked))]
    NotFound {
        /// The requested id.
        id: String,
        /// Whether the lookup was scoped to a player.
        owner_checked: bool,
    },

    /// The storage layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

const fn not_found_message(owner_checked: &bool) -> &'static str {
    if *owner_checked {
        "Model not found or doesn't belong to this player"
    } else {
        "Model not found"
    }
}

impl ExportError {
    /// Build an [`ExportError::InvalidArgument`].
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Numeric error code reported to callers.
    #[must_use]
    pub const fn code(&self) -> u32 {
        match self {
            Self::InvalidArgument { .. } => CODE_INVALID_ARGUMENT,
            Self::QuotaExceeded { .. } => CODE_QUOTA_EXCEEDED,
            Self::DuplicateId { .. } => CODE_DUPLICATE_ID,
            Self::NotFound { .. } => CODE_NOT_FOUND,
            Self::Storage(_) => CODE_INTERNAL,
        }
    }

    /// HTTP-equivalent status for this error.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::InvalidArgument { .. } | Self::QuotaExceeded { .. } | Self::DuplicateId { .. } => {
                400
            }
            Self::NotFound { .. } => 404,
            Self::Storage(_) => 500,
        }
    }

    /// Returns true for failures the caller did not cause.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Message safe to expose to callers.
    ///
    /// Internal failures collapse to a fixed generic message.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Storage errors.
///
/// These errors represent failures in database operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Failed to connect to the database.
    #[error("Database connection failed: {message}")]
    ConnectionFailed {
        /// Description of the connection failure.
        message: String,
    },

    /// A database query failed.
    #[error("Query failed: {query} - {message}")]
    QueryFailed {
        /// The query that failed (may be truncated).
        query: String,
        /// Description of the failure.
        message: String,
    },

    /// A row with the same primary key already exists.
    #[error("Duplicate key: {key}")]
    DuplicateKey {
        /// The conflicting key.
        key: String,
    },

    /// Database migration failed.
    #[error("Migration failed: {version} - {message}")]
    MigrationFailed {
        /// The migration version that failed.
        version: String,
        /// Description of the failure.
        message: String,
    },

    /// Internal storage error.
    #[error("Internal storage error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

/// MCP protocol errors.
///
/// These errors represent failures in MCP JSON-RPC communication.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum McpError {
    /// The transport could not be initialized.
    #[error("Transport initialization failed: {message}")]
    TransportFailed {
        /// Description of the failure.
        message: String,
    },

    /// Internal server error.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
