//! MCP server implementation.
//!
//! This module provides:
//! - Tool definitions with rmcp macros
//! - The JSON result envelope shared by every tool
//! - Stdio transport
//!
//! # Tools
//!
//! | Tool | Operation |
//! |------|-----------|
//! | `create_export` | store a new export |
//! | `list_player_exports` | list a player's exports, evicting expired ones |
//! | `import_export` | read an export, consuming it if expired |
//! | `update_export` | replace a payload unless expired |
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use model_export_store::config::Config;
//! use model_export_store::server::{AppState, ExportServer};
//! use model_export_store::storage::SqliteStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let storage = SqliteStorage::new(&config.database_path).await?;
//! let _server = ExportServer::new(Arc::new(AppState::new(storage, config)));
//! # Ok(())
//! # }
//! ```

mod mcp;
mod requests;
mod responses;
mod tools;
mod transport;
mod types;

pub use mcp::McpServer;
pub use requests::{
    CreateExportRequest, ImportExportRequest, ListPlayerExportsRequest, UpdateExportRequest,
};
pub use responses::{ApiErrorBody, Envelope, STATUS_CREATED, STATUS_OK};
pub use tools::ExportServer;
pub use transport::StdioTransport;
pub use types::AppState;
