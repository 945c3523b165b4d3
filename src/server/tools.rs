//! Tool definitions with rmcp macros.
//!
//! The four export tools are declared with `#[tool_router]` and dispatched
//! through `#[tool_handler]`. Each tool delegates to a `handle_*` method
//! that returns an [`Envelope`], which is then rendered as the tool result.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler};
use tracing::debug;

use super::requests::{
    CreateExportRequest, ImportExportRequest, ListPlayerExportsRequest, UpdateExportRequest,
};
use super::responses::{Envelope, STATUS_CREATED, STATUS_OK};
use super::types::AppState;
use crate::error::ExportError;
use crate::exports::{ExportView, ImportedExport};
use crate::storage::StoredExport;

const MISSING_CREATE_FIELDS: &str =
    "Missing required fields: player_user_id and serialized_data are required";

/// MCP server exposing the model export tools.
#[derive(Clone)]
pub struct ExportServer {
    /// Shared application state.
    pub state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for ExportServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportServer")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl ExportServer {
    /// Creates a new export server.
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    /// Store a new export.
    pub async fn handle_create(&self, req: CreateExportRequest) -> Envelope<StoredExport> {
        let (Some(player_user_id), Some(serialized_data)) = (req.player_user_id, req.serialized_data)
        else {
            return Envelope::failure(&ExportError::invalid(MISSING_CREATE_FIELDS));
        };

        let result = self
            .state
            .store
            .create(player_user_id, &serialized_data, req.id.as_deref())
            .await;
        Envelope::from_result(result, STATUS_CREATED)
    }

    /// List a player's exports.
    pub async fn handle_list(&self, req: ListPlayerExportsRequest) -> Envelope<Vec<ExportView>> {
        let result = self.state.store.list_by_player(req.player_user_id).await;
        Envelope::from_result(result, STATUS_OK)
    }

    /// Import (read and consume) an export.
    pub async fn handle_import(&self, req: ImportExportRequest) -> Envelope<ImportedExport> {
        let result = self
            .state
            .store
            .read_and_consume(&req.id, req.player_user_id)
            .await;
        Envelope::from_result(result, STATUS_OK)
    }

    /// Replace an export's payload.
    pub async fn handle_update(&self, req: UpdateExportRequest) -> Envelope<ExportView> {
        let serialized_data = req.serialized_data.unwrap_or_default();
        let result = self.state.store.update(&req.id, &serialized_data).await;
        Envelope::from_result(result, STATUS_OK)
    }
}

#[tool_router]
impl ExportServer {
    #[tool(
        description = "Store a serialized model for a player. Fails if the player already holds the maximum number of exports or the id is taken. Omit id to have a 12-digit id generated."
    )]
    async fn create_export(
        &self,
        Parameters(req): Parameters<CreateExportRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(tool = "create_export", "Tool invoked");
        Ok(self.handle_create(req).await.into_call_result())
    }

    #[tool(
        description = "List a player's model exports, most recent first. Expired exports are flagged with is_expired and removed afterwards."
    )]
    async fn list_player_exports(
        &self,
        Parameters(req): Parameters<ListPlayerExportsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(tool = "list_player_exports", "Tool invoked");
        Ok(self.handle_list(req).await.into_call_result())
    }

    #[tool(
        description = "Fetch a model export owned by the player. An expired export is returned once with is_expired set, then deleted."
    )]
    async fn import_export(
        &self,
        Parameters(req): Parameters<ImportExportRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(tool = "import_export", "Tool invoked");
        Ok(self.handle_import(req).await.into_call_result())
    }

    #[tool(
        description = "Replace a model export's payload. If the export has expired it is deleted instead and returned unchanged with is_expired set."
    )]
    async fn update_export(
        &self,
        Parameters(req): Parameters<UpdateExportRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(tool = "update_export", "Tool invoked");
        Ok(self.handle_update(req).await.into_call_result())
    }
}

#[tool_handler]
impl ServerHandler for ExportServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Stores serialized player models with a per-player quota and a 24-hour lifetime."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
