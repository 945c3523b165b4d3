//! `ExportRepository` implementation for `SqliteStorage`.

#![allow(clippy::missing_errors_doc)]

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::traits::ExportRepository;

use super::core::SqliteStorage;
use super::types::StoredExport;

#[async_trait]
impl ExportRepository for SqliteStorage {
    async fn count_for_player(&self, player_user_id: i64) -> Result<u32, StorageError> {
        self.count_exports_for_player(player_user_id).await
    }

    async fn exists(&self, id: &str) -> Result<bool, StorageError> {
        self.export_exists(id).await
    }

    async fn insert_within_limit(
        &self,
        export: &StoredExport,
        limit: u32,
    ) -> Result<bool, StorageError> {
        self.insert_export(export, limit).await
    }

    async fn find(&self, id: &str) -> Result<Option<StoredExport>, StorageError> {
        self.get_export(id).await
    }

    async fn find_owned(
        &self,
        id: &str,
        player_user_id: i64,
    ) -> Result<Option<StoredExport>, StorageError> {
        self.get_owned_export(id, player_user_id).await
    }

    async fn list_for_player(
        &self,
        player_user_id: i64,
    ) -> Result<Vec<StoredExport>, StorageError> {
        self.get_exports_for_player(player_user_id).await
    }

    async fn update_payload(&self, id: &str, serialized_data: &str) -> Result<bool, StorageError> {
        self.update_export_payload(id, serialized_data).await
    }

    async fn delete(&self, id: &str) -> Result<u64, StorageError> {
        self.delete_export(id).await
    }

    async fn delete_many(&self, ids: &[String]) -> Result<u64, StorageError> {
        self.delete_exports(ids).await
    }
}

/// Blanket implementation for `Arc<SqliteStorage>` to allow sharing storage across threads.
#[async_trait]
impl ExportRepository for Arc<SqliteStorage> {
    async fn count_for_player(&self, player_user_id: i64) -> Result<u32, StorageError> {
        self.as_ref().count_for_player(player_user_id).await
    }

    async fn exists(&self, id: &str) -> Result<bool, StorageError> {
        self.as_ref().exists(id).await
    }

    async fn insert_within_limit(
        &self,
        export: &StoredExport,
        limit: u32,
    ) -> Result<bool, StorageError> {
        self.as_ref().insert_within_limit(export, limit).await
    }

    async fn find(&self, id: &str) -> Result<Option<StoredExport>, StorageError> {
        self.as_ref().find(id).await
    }

    async fn find_owned(
        &self,
        id: &str,
        player_user_id: i64,
    ) -> Result<Option<StoredExport>, StorageError> {
        self.as_ref().find_owned(id, player_user_id).await
    }

    async fn list_for_player(
        &self,
        player_user_id: i64,
    ) -> Result<Vec<StoredExport>, StorageError> {
        self.as_ref().list_for_player(player_user_id).await
    }

    async fn update_payload(&self, id: &str, serialized_data: &str) -> Result<bool, StorageError> {
        self.as_ref().update_payload(id, serialized_data).await
    }

    async fn delete(&self, id: &str) -> Result<u64, StorageError> {
        self.as_ref().delete(id).await
    }

    async fn delete_many(&self, ids: &[String]) -> Result<u64, StorageError> {
        self.as_ref().delete_many(ids).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::storage::core::tests::test_storage;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_repository_roundtrip_through_trait() {
        let storage = test_storage().await;
        let repo: &dyn ExportRepository = &storage;

        let export = StoredExport::new("100000000000", 42, "X");
        assert!(repo.insert_within_limit(&export, 5).await.unwrap());
        assert!(repo.exists("100000000000").await.unwrap());
        assert_eq!(repo.count_for_player(42).await.unwrap(), 1);
        assert_eq!(repo.find_owned("100000000000", 42).await.unwrap(), Some(export));
        assert_eq!(repo.delete("100000000000").await.unwrap(), 1);
        assert!(repo.find("100000000000").await.unwrap().is_none());
    }

    #[tokio::test]
    #[serial]
    async fn test_arc_storage_delegates() {
        let storage = Arc::new(test_storage().await);

        let export = StoredExport::new("100000000001", 7, "payload");
        assert!(storage.insert_within_limit(&export, 5).await.unwrap());
        assert!(ExportRepository::update_payload(&storage, "100000000001", "next")
            .await
            .unwrap());

        let listed = ExportRepository::list_for_player(&storage, 7).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].serialized_data, "next");

        let removed = ExportRepository::delete_many(&storage, &["100000000001".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }
}
