//! Request types for export tools.
//!
//! This module contains all request types with JsonSchema support for tool parameters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Request to store a new model export.
///
/// Both required fields are optional at the schema level so that a missing
/// field is reported through the error envelope rather than as a protocol
/// error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CreateExportRequest {
    /// Owning player (positive integer).
    pub player_user_id: Option<i64>,
    /// Opaque serialized model payload.
    pub serialized_data: Option<String>,
    /// Optional 12-digit id; generated when omitted.
    pub id: Option<String>,
}

/// Request to list a player's exports.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListPlayerExportsRequest {
    /// Player whose exports to list.
    pub player_user_id: i64,
}

/// Request to import an export.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImportExportRequest {
    /// Export id.
    pub id: String,
    /// Player who owns the export.
    pub player_user_id: i64,
}

/// Request to replace an export's payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateExportRequest {
    /// Export id.
    pub id: String,
    /// New serialized payload.
    pub serialized_data: Option<String>,
}
