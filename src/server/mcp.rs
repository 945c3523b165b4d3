//! Main MCP server orchestration.
//!
//! This module provides the main entry point for running the export server.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::error::{AppError, McpError};
use crate::storage::SqliteStorage;

use super::tools::ExportServer;
use super::transport::StdioTransport;
use super::types::AppState;

/// Main MCP server that wires storage, the export store, and the transport.
#[derive(Debug)]
pub struct McpServer {
    /// Server configuration.
    config: Config,
}

impl McpServer {
    /// Creates a new MCP server with the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the server using stdio transport.
    ///
    /// Opens the database, runs migrations, and serves requests until the
    /// client disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Storage initialization fails
    /// - The MCP handshake fails
    /// - The running service terminates abnormally
    pub async fn run_stdio(&self) -> Result<(), AppError> {
        let storage = SqliteStorage::new(&self.config.database_path).await?;
        info!(database = %self.config.database_path, "Storage ready");

        let state = AppState::new(storage, self.config.clone());
        let server = ExportServer::new(Arc::new(state));

        let running = StdioTransport::new().serve(server).await?;
        running.waiting().await.map_err(|e| {
            AppError::Mcp(McpError::Internal {
                message: e.to_string(),
            })
        })?;

        Ok(())
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}
