//! Trait definitions for mockable dependencies.
//!
//! This module defines traits for:
//! - [`ExportRepository`]: Database operations abstraction
//! - [`TimeProvider`]: Time abstraction for testing
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use model_export_store::traits::{TimeProvider, RealTimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;
use crate::storage::StoredExport;

/// Repository trait for model exports.
///
/// Every method is a single statement against the backing store; the
/// lifecycle policy lives in [`crate::exports::ExportStore`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExportRepository: Send + Sync {
    /// Count the exports stored for a player.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn count_for_player(&self, player_user_id: i64) -> Result<u32, StorageError>;

    /// Check whether an id is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn exists(&self, id: &str) -> Result<bool, StorageError>;

    /// Insert an export unless the player already holds `limit` exports.
    ///
    /// Returns `false` when the limit was reached and nothing was written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DuplicateKey`] if the id is taken, or another
    /// [`StorageError`] if the database operation fails.
    async fn insert_within_limit(
        &self,
        export: &StoredExport,
        limit: u32,
    ) -> Result<bool, StorageError>;

    /// Find an export by id.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn find(&self, id: &str) -> Result<Option<StoredExport>, StorageError>;

    /// Find an export by id and owner.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn find_owned(
        &self,
        id: &str,
        player_user_id: i64,
    ) -> Result<Option<StoredExport>, StorageError>;

    /// List a player's exports, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn list_for_player(&self, player_user_id: i64)
        -> Result<Vec<StoredExport>, StorageError>;

    /// Replace an export's payload. Returns `false` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn update_payload(&self, id: &str, serialized_data: &str)
        -> Result<bool, StorageError>;

    /// Delete one export. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn delete(&self, id: &str) -> Result<u64, StorageError>;

    /// Delete a batch of exports in one statement.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the database operation fails.
    async fn delete_many(&self, ids: &[String]) -> Result<u64, StorageError>;
}

/// Time provider trait for deterministic testing.
///
/// This trait abstracts time operations to allow for
/// deterministic testing by providing fixed timestamps.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
