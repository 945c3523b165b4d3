//! Model export lifecycle.
//!
//! A model export is an opaque serialized payload a player stores for later
//! import. This module owns the rules around it:
//!
//! - ids are 12-digit strings, caller-supplied or randomly generated
//! - each player may hold a bounded number of exports
//! - exports expire a fixed time after creation
//!
//! Expiry is enforced lazily. There is no background sweeper; whichever
//! operation first observes an expired export deletes it and still reports
//! it once with `is_expired: true`.
//!
//! # Example
//!
//! ```ignore
//! use model_export_store::exports::{ExportPolicy, ExportStore};
//! use model_export_store::storage::SqliteStorage;
//!
//! let storage = SqliteStorage::new_in_memory().await?;
//! let store = ExportStore::new(storage, ExportPolicy::default());
//!
//! let created = store.create(42, "{\"weights\":[]}", None).await?;
//! let imported = store.read_and_consume(&created.id, 42).await?;
//! assert!(!imported.is_expired);
//! ```

mod expiry;
mod store;
mod types;

pub use expiry::ExpiryPolicy;
pub use store::{ExportPolicy, ExportStore, SqliteExportStore};
pub use types::{
    ExportId, ExportView, ImportedExport, PlayerUserId, EXPORT_ID_LEN, MAX_GENERATED_ID,
    MIN_GENERATED_ID,
};
