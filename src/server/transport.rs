//! Transport layer for the MCP server.
//!
//! Only stdio is supported: JSON-RPC on stdin/stdout, logs on stderr.

use rmcp::service::{RoleServer, RunningService};
use rmcp::transport::stdio;
use rmcp::ServiceExt;

use super::tools::ExportServer;
use crate::error::{AppError, McpError};

/// Stdio transport handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioTransport;

impl StdioTransport {
    /// Creates a new stdio transport.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Starts serving `server` over stdin/stdout.
    ///
    /// Returns once the MCP handshake has completed; await
    /// [`RunningService::waiting`] to block until the client disconnects.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::TransportFailed`] if the handshake fails.
    pub async fn serve(
        self,
        server: ExportServer,
    ) -> Result<RunningService<RoleServer, ExportServer>, AppError> {
        server.serve(stdio()).await.map_err(|e| {
            AppError::Mcp(McpError::TransportFailed {
                message: e.to_string(),
            })
        })
    }
}
