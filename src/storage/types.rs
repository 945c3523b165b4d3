//! Storage types for database operations.
//!
//! [`StoredExport`] is the single row type persisted in `model_exports`.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Model export stored in database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredExport {
    /// 12-digit export identifier.
    pub id: String,
    /// Owning player.
    pub player_user_id: i64,
    /// Opaque payload, returned verbatim.
    pub serialized_data: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl StoredExport {
    /// Create a new stored export timestamped now.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        player_user_id: i64,
        serialized_data: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            player_user_id,
            serialized_data: serialized_data.into(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Set creation timestamp.
    ///
    /// The timestamp is truncated to microseconds, the precision kept in
    /// the database, so the value survives a round-trip unchanged.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at.trunc_subsecs(6);
        self
    }
}
