//! Storage backend.
//!
//! This module provides the `SQLite` persistence for model exports.
//!
//! # Architecture
//!
//! The storage layer uses `SQLite` with the `sqlx` crate for async operations.
//! Every operation is a single parameterized statement; the lifecycle policy
//! (expiry, quota, lazy eviction) lives in [`crate::exports`].
//!
//! The implementation is split across submodules:
//! - `core`: Pool management, migrations, and helper functions
//! - `exports`: Model export CRUD operations
//! - `trait_impl`: `ExportRepository` implementation
//!
//! # Example
//!
//! ```ignore
//! use model_export_store::storage::{SqliteStorage, StoredExport};
//!
//! let storage = SqliteStorage::new("./data/exports.db").await?;
//! storage.insert_export(&StoredExport::new("100000000000", 42, "X"), 5).await?;
//! ```

mod core;
mod exports;
mod trait_impl;
mod types;

pub use self::core::SqliteStorage;
pub use types::StoredExport;
