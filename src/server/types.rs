//! Server types and shared state.
//!
//! This module defines the application state shared by the tool handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::exports::{ExportPolicy, ExportStore, SqliteExportStore};
use crate::storage::SqliteStorage;

/// Shared application state for all tool handlers.
#[derive(Clone)]
pub struct AppState {
    /// Export lifecycle service.
    pub store: Arc<SqliteExportStore>,
    /// Server configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new application state.
    ///
    /// The export policy (TTL, quota, id attempts) is taken from `config`.
    #[must_use]
    pub fn new(storage: SqliteStorage, config: Config) -> Self {
        let store = ExportStore::new(storage, ExportPolicy::from(&config));
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
