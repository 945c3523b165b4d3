//! Export lifecycle operations.

use chrono::SubsecRound;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ExportError, StorageError};
use crate::storage::{SqliteStorage, StoredExport};
use crate::traits::{ExportRepository, RealTimeProvider, TimeProvider};

use super::expiry::ExpiryPolicy;
use super::types::{ExportId, ExportView, ImportedExport, PlayerUserId};

/// Limits applied by the [`ExportStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportPolicy {
    /// Time-to-live for exports.
    pub expiry: ExpiryPolicy,
    /// Maximum stored exports per player.
    pub max_exports_per_player: u32,
    /// Ids drawn before a generated-id collision is reported.
    pub id_generation_attempts: u32,
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ExportPolicy {
    fn from(config: &Config) -> Self {
        Self {
            expiry: ExpiryPolicy::new(config.export_ttl()),
            max_exports_per_player: config.max_exports_per_player,
            id_generation_attempts: config.id_generation_attempts.max(1),
        }
    }
}

/// Export store backed by `SQLite` and the system clock.
pub type SqliteExportStore = ExportStore<SqliteStorage, RealTimeProvider>;

/// Owns the lifecycle of model exports.
///
/// Expiry is enforced lazily: an expired export is deleted by whichever
/// operation first observes it, and that operation still reports it once
/// with `is_expired` set.
#[derive(Debug)]
pub struct ExportStore<R, C = RealTimeProvider> {
    repository: R,
    clock: C,
    policy: ExportPolicy,
}

impl<R: ExportRepository> ExportStore<R, RealTimeProvider> {
    /// Create a store using the system clock.
    #[must_use]
    pub const fn new(repository: R, policy: ExportPolicy) -> Self {
        Self::with_clock(repository, RealTimeProvider, policy)
    }
}

impl<R: ExportRepository, C: TimeProvider> ExportStore<R, C> {
    /// Create a store with an explicit clock.
    #[must_use]
    pub const fn with_clock(repository: R, clock: C, policy: ExportPolicy) -> Self {
        Self {
            repository,
            clock,
            policy,
        }
    }

    /// The underlying repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// The active policy.
    #[must_use]
    pub const fn policy(&self) -> &ExportPolicy {
        &self.policy
    }

    /// Create an export for a player.
    ///
    /// Checks run in order: input shape, per-player quota, id format, id
    /// uniqueness. When `id` is omitted a random 12-digit id is drawn, and
    /// redrawn on collision up to the configured number of attempts.
    ///
    /// # Errors
    ///
    /// - [`ExportError::InvalidArgument`] for a non-positive player, empty
    ///   payload, or malformed id
    /// - [`ExportError::QuotaExceeded`] if the player is at the limit
    /// - [`ExportError::DuplicateId`] if the id is taken
    /// - [`ExportError::Storage`] if the database fails
    pub async fn create(
        &self,
        player_user_id: i64,
        serialized_data: &str,
        id: Option<&str>,
    ) -> Result<StoredExport, ExportError> {
        if serialized_data.is_empty() {
            return Err(ExportError::invalid(
                "Missing required fields: player_user_id and serialized_data are required",
            ));
        }
        let player = PlayerUserId::new(player_user_id)?;
        let limit = self.policy.max_exports_per_player;

        debug!(player_user_id, explicit_id = id.is_some(), "Creating export");

        let count = self.repository.count_for_player(player.get()).await?;
        if count >= limit {
            warn!(player_user_id, count, limit, "Export quota exceeded");
            return Err(ExportError::QuotaExceeded { limit });
        }

        let attempts = if id.is_some() {
            1
        } else {
            self.policy.id_generation_attempts
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            let candidate = match id {
                Some(id) => ExportId::parse(id)?,
                None => ExportId::generate(),
            };

            match self.try_insert(&candidate, player, serialized_data, limit).await {
                Err(ExportError::DuplicateId { .. }) if attempt < attempts => {
                    warn!(id = %candidate, attempt, "Generated export id collided, redrawing");
                }
                other => return other,
            }
        }
    }

    async fn try_insert(
        &self,
        id: &ExportId,
        player: PlayerUserId,
        serialized_data: &str,
        limit: u32,
    ) -> Result<StoredExport, ExportError> {
        let duplicate = || ExportError::DuplicateId {
            id: id.to_string(),
        };

        if self.repository.exists(id.as_str()).await? {
            return Err(duplicate());
        }

        let export = StoredExport {
            id: id.to_string(),
            player_user_id: player.get(),
            serialized_data: serialized_data.to_string(),
            created_at: self.clock.now().trunc_subsecs(6),
        };

        match self.repository.insert_within_limit(&export, limit).await {
            Ok(true) => {
                info!(id = %export.id, player_user_id = export.player_user_id, "Export created");
                Ok(export)
            }
            Ok(false) => {
                warn!(player_user_id = player.get(), limit, "Export quota reached concurrently");
                Err(ExportError::QuotaExceeded { limit })
            }
            Err(StorageError::DuplicateKey { .. }) => Err(duplicate()),
            Err(e) => Err(e.into()),
        }
    }

    /// List a player's exports, most recent first, evicting expired ones.
    ///
    /// A single "now" is used for the whole batch. Expired exports are
    /// deleted in one statement but still returned with `is_expired` set.
    ///
    /// # Errors
    ///
    /// - [`ExportError::InvalidArgument`] for a non-positive player
    /// - [`ExportError::Storage`] if the database fails
    pub async fn list_by_player(&self, player_user_id: i64) -> Result<Vec<ExportView>, ExportError> {
        let player = PlayerUserId::new(player_user_id)?;
        let now = self.clock.now();

        let views: Vec<ExportView> = self
            .repository
            .list_for_player(player.get())
            .await?
            .into_iter()
            .map(|export| {
                let expired = self.policy.expiry.is_expired(export.created_at, now);
                ExportView::new(export, expired)
            })
            .collect();

        let expired_ids: Vec<String> = views
            .iter()
            .filter(|view| view.is_expired)
            .map(|view| view.export.id.clone())
            .collect();

        if !expired_ids.is_empty() {
            let deleted = self.repository.delete_many(&expired_ids).await?;
            info!(player_user_id, expired = expired_ids.len(), deleted, "Evicted expired exports");
        }

        debug!(player_user_id, count = views.len(), "Listed exports");
        Ok(views)
    }

    /// Read an export for its owner, deleting it if it has expired.
    ///
    /// An expired export is handed back exactly once, then it is gone.
    ///
    /// # Errors
    ///
    /// - [`ExportError::InvalidArgument`] for a non-positive player
    /// - [`ExportError::NotFound`] if no export has this id and owner
    /// - [`ExportError::Storage`] if the database fails
    pub async fn read_and_consume(
        &self,
        id: &str,
        player_user_id: i64,
    ) -> Result<ImportedExport, ExportError> {
        let player = PlayerUserId::new(player_user_id)?;

        let export = self
            .repository
            .find_owned(id, player.get())
            .await?
            .ok_or_else(|| ExportError::NotFound {
                id: id.to_string(),
                owner_checked: true,
            })?;

        let is_expired = self.policy.expiry.is_expired(export.created_at, self.clock.now());
        if is_expired {
            self.repository.delete(&export.id).await?;
            info!(id = %export.id, player_user_id, "Evicted expired export on import");
        }

        Ok(ImportedExport {
            id: export.id,
            serialized_data: export.serialized_data,
            is_expired,
        })
    }

    /// Replace an export's payload unless it has expired.
    ///
    /// An expired export is deleted instead and returned as it was, with
    /// `is_expired` set; the new payload is discarded.
    ///
    /// # Errors
    ///
    /// - [`ExportError::InvalidArgument`] for an empty payload
    /// - [`ExportError::NotFound`] if no export has this id
    /// - [`ExportError::Storage`] if the database fails
    pub async fn update(&self, id: &str, serialized_data: &str) -> Result<ExportView, ExportError> {
        if serialized_data.is_empty() {
            return Err(ExportError::invalid("serialized_data is required"));
        }

        let not_found = || ExportError::NotFound {
            id: id.to_string(),
            owner_checked: false,
        };

        let existing = self.repository.find(id).await?.ok_or_else(not_found)?;

        if self.policy.expiry.is_expired(existing.created_at, self.clock.now()) {
            self.repository.delete(&existing.id).await?;
            info!(id = %existing.id, "Discarded update to expired export");
            return Ok(ExportView::new(existing, true));
        }

        if !self.repository.update_payload(id, serialized_data).await? {
            return Err(not_found());
        }

        let updated = self.repository.find(id).await?.ok_or_else(not_found)?;
        debug!(id, "Export updated");
        Ok(ExportView::new(updated, false))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use crate::test_utils::{export_created, fixed_clock, mock_repository_with_count, t0};
    use crate::traits::MockExportRepository;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    async fn sqlite_store_at(
        now: chrono::DateTime<chrono::Utc>,
    ) -> ExportStore<SqliteStorage, crate::traits::MockTimeProvider> {
        let storage = SqliteStorage::new_in_memory().await.unwrap();
        ExportStore::with_clock(storage, fixed_clock(now), ExportPolicy::default())
    }

    // ========== create ==========

    #[tokio::test]
    async fn test_create_rejects_empty_payload_before_touching_storage() {
        let repo = MockExportRepository::new();
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let err = store.create(42, "", None).await.unwrap_err();
        assert!(matches!(err, ExportError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_player() {
        let repo = MockExportRepository::new();
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let err = store.create(0, "X", None).await.unwrap_err();
        assert_eq!(err, ExportError::invalid("Invalid player_user_id"));
    }

    #[tokio::test]
    async fn test_create_quota_checked_before_id_format() {
        let repo = mock_repository_with_count(5);
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let err = store.create(42, "X", Some("bad-id")).await.unwrap_err();
        assert_eq!(err, ExportError::QuotaExceeded { limit: 5 });
    }

    #[tokio::test]
    async fn test_create_invalid_explicit_id() {
        let repo = mock_repository_with_count(0);
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let err = store.create(42, "X", Some("12345")).await.unwrap_err();
        assert_eq!(err, ExportError::invalid("ID must be a 12-digit number"));
    }

    #[tokio::test]
    async fn test_create_explicit_duplicate_is_not_retried() {
        let mut repo = mock_repository_with_count(0);
        repo.expect_exists().times(1).returning(|_| Ok(true));
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let err = store.create(42, "X", Some("100000000000")).await.unwrap_err();
        assert_eq!(
            err,
            ExportError::DuplicateId {
                id: "100000000000".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_create_generated_id_redraws_on_collision() {
        let mut repo = mock_repository_with_count(0);
        let mut seq = mockall::Sequence::new();
        repo.expect_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        repo.expect_exists()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        repo.expect_insert_within_limit()
            .times(1)
            .returning(|_, _| Ok(true));
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let created = store.create(42, "X", None).await.unwrap();
        assert!(ExportId::parse(&created.id).is_ok());
        assert_eq!(created.created_at, t0());
    }

    #[tokio::test]
    async fn test_create_generated_id_gives_up_after_attempts() {
        let mut repo = mock_repository_with_count(0);
        repo.expect_exists().times(2).returning(|_| Ok(true));
        let policy = ExportPolicy {
            id_generation_attempts: 2,
            ..ExportPolicy::default()
        };
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), policy);

        let err = store.create(42, "X", None).await.unwrap_err();
        assert!(matches!(err, ExportError::DuplicateId { .. }));
    }

    #[tokio::test]
    async fn test_create_maps_insert_conflict_to_duplicate() {
        let mut repo = mock_repository_with_count(0);
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_insert_within_limit().returning(|export, _| {
            Err(StorageError::DuplicateKey {
                key: export.id.clone(),
            })
        });
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let err = store.create(42, "X", Some("100000000000")).await.unwrap_err();
        assert!(matches!(err, ExportError::DuplicateId { .. }));
    }

    #[tokio::test]
    async fn test_create_reports_quota_lost_to_concurrent_creator() {
        let mut repo = mock_repository_with_count(4);
        repo.expect_exists().returning(|_| Ok(false));
        repo.expect_insert_within_limit()
            .withf(|_, limit| *limit == 5)
            .returning(|_, _| Ok(false));
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let err = store.create(42, "X", Some("100000000000")).await.unwrap_err();
        assert_eq!(err, ExportError::QuotaExceeded { limit: 5 });
    }

    #[tokio::test]
    async fn test_create_propagates_storage_failure() {
        let mut repo = MockExportRepository::new();
        repo.expect_count_for_player().returning(|_| {
            Err(StorageError::ConnectionFailed {
                message: "gone".into(),
            })
        });
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let err = store.create(42, "X", None).await.unwrap_err();
        assert!(err.is_internal());
    }

    #[tokio::test]
    #[serial]
    async fn test_create_then_import_roundtrip() {
        let store = sqlite_store_at(t0()).await;

        let created = store.create(42, "payload", Some("100000000000")).await.unwrap();
        assert_eq!(created.created_at, t0());

        let imported = store.read_and_consume("100000000000", 42).await.unwrap();
        assert_eq!(
            imported,
            ImportedExport {
                id: "100000000000".to_string(),
                serialized_data: "payload".to_string(),
                is_expired: false,
            }
        );

        // A live import does not consume the export.
        assert!(store.read_and_consume("100000000000", 42).await.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_quota_is_per_player() {
        let store = sqlite_store_at(t0()).await;

        for _ in 0..5 {
            store.create(42, "X", None).await.unwrap();
        }
        let err = store.create(42, "X", None).await.unwrap_err();
        assert_eq!(err, ExportError::QuotaExceeded { limit: 5 });

        assert!(store.create(43, "X", None).await.is_ok());
    }

    // ========== list_by_player ==========

    #[tokio::test]
    async fn test_list_rejects_invalid_player() {
        let store = ExportStore::with_clock(
            MockExportRepository::new(),
            fixed_clock(t0()),
            ExportPolicy::default(),
        );
        let err = store.list_by_player(-3).await.unwrap_err();
        assert_eq!(err, ExportError::invalid("Invalid player_user_id"));
    }

    #[tokio::test]
    async fn test_list_empty_does_not_delete() {
        let mut repo = MockExportRepository::new();
        repo.expect_list_for_player().returning(|_| Ok(Vec::new()));
        repo.expect_delete_many().never();
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        assert!(store.list_by_player(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_sweeps_expired_in_one_batch() {
        let now = t0() + Duration::hours(30);
        let mut repo = MockExportRepository::new();
        repo.expect_list_for_player().returning(move |player| {
            Ok(vec![
                export_created("100000000003", player, now - Duration::hours(1)),
                export_created("100000000002", player, now - Duration::hours(25)),
                export_created("100000000001", player, now - Duration::hours(26)),
            ])
        });
        repo.expect_delete_many()
            .times(1)
            .withf(|ids| ids.len() == 2 && ids[0] == "100000000002" && ids[1] == "100000000001")
            .returning(|ids| Ok(ids.len() as u64));
        let store = ExportStore::with_clock(repo, fixed_clock(now), ExportPolicy::default());

        let views = store.list_by_player(42).await.unwrap();
        let flags: Vec<(&str, bool)> = views
            .iter()
            .map(|v| (v.export.id.as_str(), v.is_expired))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("100000000003", false),
                ("100000000002", true),
                ("100000000001", true),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_uses_one_clock_reading() {
        let mut clock = crate::traits::MockTimeProvider::new();
        clock.expect_now().times(1).return_const(t0());
        let mut repo = MockExportRepository::new();
        repo.expect_list_for_player().returning(|player| {
            Ok(vec![
                export_created("100000000001", player, t0()),
                export_created("100000000002", player, t0()),
            ])
        });
        let store = ExportStore::with_clock(repo, clock, ExportPolicy::default());

        assert_eq!(store.list_by_player(42).await.unwrap().len(), 2);
    }

    #[tokio::test]
    #[serial]
    async fn test_list_twice_is_stable() {
        let store = sqlite_store_at(t0()).await;
        store.create(42, "a", Some("100000000001")).await.unwrap();
        store.create(42, "b", Some("100000000002")).await.unwrap();

        let first = store.list_by_player(42).await.unwrap();
        let second = store.list_by_player(42).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    // ========== read_and_consume ==========

    #[tokio::test]
    async fn test_import_not_found_for_wrong_owner() {
        let mut repo = MockExportRepository::new();
        repo.expect_find_owned().returning(|_, _| Ok(None));
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let err = store.read_and_consume("100000000000", 7).await.unwrap_err();
        assert_eq!(err.code(), 4041);
        assert_eq!(
            err.to_string(),
            "Model not found or doesn't belong to this player"
        );
    }

    #[tokio::test]
    async fn test_import_expired_deletes_then_returns_payload() {
        let mut repo = MockExportRepository::new();
        repo.expect_find_owned()
            .returning(|id, player| Ok(Some(export_created(id, player, t0()))));
        repo.expect_delete()
            .with(mockall::predicate::eq("100000000000"))
            .times(1)
            .returning(|_| Ok(1));
        let store = ExportStore::with_clock(
            repo,
            fixed_clock(t0() + Duration::hours(25)),
            ExportPolicy::default(),
        );

        let imported = store.read_and_consume("100000000000", 42).await.unwrap();
        assert!(imported.is_expired);
        assert_eq!(imported.serialized_data, "data-100000000000");
    }

    // ========== update ==========

    #[tokio::test]
    async fn test_update_rejects_empty_payload() {
        let store = ExportStore::with_clock(
            MockExportRepository::new(),
            fixed_clock(t0()),
            ExportPolicy::default(),
        );
        let err = store.update("100000000000", "").await.unwrap_err();
        assert_eq!(err.code(), 400);
    }

    #[tokio::test]
    async fn test_update_missing_export() {
        let mut repo = MockExportRepository::new();
        repo.expect_find().returning(|_| Ok(None));
        let store = ExportStore::with_clock(repo, fixed_clock(t0()), ExportPolicy::default());

        let err = store.update("100000000000", "new").await.unwrap_err();
        assert_eq!(err.to_string(), "Model not found");
        assert_eq!(err.status(), 404);
    }

    #[tokio::test]
    async fn test_update_expired_discards_write() {
        let mut repo = MockExportRepository::new();
        repo.expect_find()
            .returning(|id| Ok(Some(export_created(id, 42, t0()))));
        repo.expect_update_payload().never();
        repo.expect_delete().times(1).returning(|_| Ok(1));
        let store = ExportStore::with_clock(
            repo,
            fixed_clock(t0() + Duration::hours(24) + Duration::seconds(1)),
            ExportPolicy::default(),
        );

        let view = store.update("100000000000", "new").await.unwrap();
        assert!(view.is_expired);
        assert_eq!(view.export.serialized_data, "data-100000000000");
        assert_eq!(view.export.created_at, t0());
    }

    #[tokio::test]
    #[serial]
    async fn test_update_live_keeps_created_at() {
        let store = sqlite_store_at(t0()).await;
        let created = store.create(42, "old", Some("100000000000")).await.unwrap();

        let view = store.update("100000000000", "new").await.unwrap();
        assert!(!view.is_expired);
        assert_eq!(view.export.serialized_data, "new");
        assert_eq!(view.export.created_at, created.created_at);
        assert_eq!(view.export.player_user_id, 42);
    }

    #[test]
    fn test_policy_from_config() {
        let config = Config {
            export_ttl_secs: 60,
            max_exports_per_player: 2,
            id_generation_attempts: 4,
            ..Config::default()
        };
        let policy = ExportPolicy::from(&config);
        assert_eq!(policy.expiry.ttl(), Duration::seconds(60));
        assert_eq!(policy.max_exports_per_player, 2);
        assert_eq!(policy.id_generation_attempts, 4);
    }
}
