//! Response envelope for export tools.
//!
//! Every tool answers with the same JSON shape:
//!
//! ```json
//! { "success": true, "result": { ... } }
//! { "success": false, "errors": [{ "code": 4001, "message": "..." }] }
//! ```

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::error;

use crate::error::{ExportError, CODE_INTERNAL, INTERNAL_ERROR_MESSAGE};

/// HTTP-equivalent status for a successful read or update.
pub const STATUS_OK: u16 = 200;

/// HTTP-equivalent status for a successful create.
pub const STATUS_CREATED: u16 = 201;

/// One entry of a failed envelope's `errors` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Caller-facing message.
    pub message: String,
}

impl From<&ExportError> for ApiErrorBody {
    fn from(err: &ExportError) -> Self {
        Self {
            code: err.code(),
            message: err.public_message(),
        }
    }
}

/// Uniform result envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Operation result, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    /// Failure details, present on failure.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiErrorBody>,
    #[serde(skip)]
    status: u16,
}

impl<T> Envelope<T> {
    /// A successful envelope with status 200.
    #[must_use]
    pub const fn ok(result: T) -> Self {
        Self::with_status(result, STATUS_OK)
    }

    /// A successful envelope with status 201.
    #[must_use]
    pub const fn created(result: T) -> Self {
        Self::with_status(result, STATUS_CREATED)
    }

    const fn with_status(result: T, status: u16) -> Self {
        Self {
            success: true,
            result: Some(result),
            errors: Vec::new(),
            status,
        }
    }

    /// A failed envelope for `err`.
    ///
    /// Internal failures are logged here with full detail; the envelope
    /// itself only carries the generic message.
    #[must_use]
    pub fn failure(err: &ExportError) -> Self {
        if err.is_internal() {
            error!(error = %err, "Export operation failed");
        }
        Self {
            success: false,
            result: None,
            errors: vec![ApiErrorBody::from(err)],
            status: err.status(),
        }
    }

    /// Wrap an operation result, using `success_status` when it succeeded.
    #[must_use]
    pub fn from_result(result: Result<T, ExportError>, success_status: u16) -> Self {
        match result {
            Ok(value) => Self::with_status(value, success_status),
            Err(err) => Self::failure(&err),
        }
    }

    /// HTTP-equivalent status.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }
}

impl<T: Serialize> Envelope<T> {
    /// Render the envelope as an MCP tool result.
    ///
    /// Failed envelopes are flagged as tool errors.
    #[must_use]
    pub fn into_call_result(self) -> CallToolResult {
        match serde_json::to_string(&self) {
            Ok(json) if self.success => CallToolResult::success(vec![Content::text(json)]),
            Ok(json) => CallToolResult::error(vec![Content::text(json)]),
            Err(e) => {
                error!(error = %e, "Failed to serialize tool response");
                let fallback = serde_json::json!({
                    "success": false,
                    "errors": [{ "code": CODE_INTERNAL, "message": INTERNAL_ERROR_MESSAGE }],
                });
                CallToolResult::error(vec![Content::text(fallback.to_string())])
            }
        }
    }
}
