//! Model export storage operations.

#![allow(clippy::missing_errors_doc)]

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::StorageError;

use super::core::SqliteStorage;
use super::types::StoredExport;

const SELECT_COLUMNS: &str = "SELECT id, player_user_id, serialized_data, created_at FROM model_exports";

impl SqliteStorage {
    /// Count the exports currently stored for a player.
    pub async fn count_exports_for_player(&self, player_user_id: i64) -> Result<u32, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM model_exports WHERE player_user_id = ?")
            .bind(player_user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::query_error("COUNT model_exports", format!("{e}")))?;

        let count: i64 = row.get("count");
        u32::try_from(count).map_err(|e| StorageError::Internal {
            message: format!("Export count out of range: {e}"),
        })
    }

    /// Check whether an export id is taken.
    pub async fn export_exists(&self, id: &str) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT 1 FROM model_exports WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT model_exports", format!("{e}")))?;

        Ok(row.is_some())
    }

    /// Insert an export unless its player already holds `limit` exports.
    ///
    /// The count and the insert run as one statement, so concurrent creators
    /// for the same player cannot both slip under the limit. Returns `false`
    /// when the limit was reached and nothing was written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::DuplicateKey`] if the id is already taken.
    pub async fn insert_export(
        &self,
        export: &StoredExport,
        limit: u32,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "INSERT INTO model_exports (id, player_user_id, serialized_data, created_at) \
             SELECT ?, ?, ?, ? \
             WHERE (SELECT COUNT(*) FROM model_exports WHERE player_user_id = ?) < ?",
        )
        .bind(&export.id)
        .bind(export.player_user_id)
        .bind(&export.serialized_data)
        .bind(Self::format_datetime(&export.created_at))
        .bind(export.player_user_id)
        .bind(i64::from(limit))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                StorageError::DuplicateKey {
                    key: export.id.clone(),
                }
            } else {
                Self::query_error("INSERT model_exports", format!("{e}"))
            }
        })?;

        Ok(result.rows_affected() == 1)
    }

    /// Get an export by id.
    pub async fn get_export(&self, id: &str) -> Result<Option<StoredExport>, StorageError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT model_exports", format!("{e}")))?;

        row.as_ref().map(Self::row_to_export).transpose()
    }

    /// Get an export by id, only if it belongs to the given player.
    pub async fn get_owned_export(
        &self,
        id: &str,
        player_user_id: i64,
    ) -> Result<Option<StoredExport>, StorageError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ? AND player_user_id = ?"))
            .bind(id)
            .bind(player_user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::query_error("SELECT model_exports", format!("{e}")))?;

        row.as_ref().map(Self::row_to_export).transpose()
    }

    /// Get all exports for a player, most recent first.
    pub async fn get_exports_for_player(
        &self,
        player_user_id: i64,
    ) -> Result<Vec<StoredExport>, StorageError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE player_user_id = ? ORDER BY created_at DESC"
        ))
        .bind(player_user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_error("SELECT model_exports", format!("{e}")))?;

        rows.iter().map(Self::row_to_export).collect()
    }

    /// Replace an export's payload. `created_at` is left untouched.
    ///
    /// Returns `false` if no export has this id.
    pub async fn update_export_payload(
        &self,
        id: &str,
        serialized_data: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE model_exports SET serialized_data = ? WHERE id = ?")
            .bind(serialized_data)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("UPDATE model_exports", format!("{e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete an export. Returns the number of rows removed.
    pub async fn delete_export(&self, id: &str) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM model_exports WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::query_error("DELETE model_exports", format!("{e}")))?;

        Ok(result.rows_affected())
    }

    /// Delete a batch of exports.
    ///
    /// Ids are bound in chunks that stay under `SQLite`'s variable limit, so a
    /// player's whole sweep is normally a single statement.
    pub async fn delete_exports(&self, ids: &[String]) -> Result<u64, StorageError> {
        const MAX_VARS: usize = 999;

        if ids.is_empty() {
            return Ok(0);
        }

        let mut total_deleted = 0u64;

        for chunk in ids.chunks(MAX_VARS) {
            let placeholders: String = chunk.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
            let sql = format!("DELETE FROM model_exports WHERE id IN ({placeholders})");

            let mut query = sqlx::query(&sql);
            for id in chunk {
                query = query.bind(id);
            }

            let result = query
                .execute(&self.pool)
                .await
                .map_err(|e| Self::query_error("DELETE model_exports", format!("{e}")))?;
            total_deleted += result.rows_affected();
        }

        Ok(total_deleted)
    }

    fn row_to_export(row: &SqliteRow) -> Result<StoredExport, StorageError> {
        let created_at_str: String = row.get("created_at");
        Ok(StoredExport {
            id: row.get("id"),
            player_user_id: row.get("player_user_id"),
            serialized_data: row.get("serialized_data"),
            created_at: Self::parse_datetime(&created_at_str)?,
        })
    }
}
