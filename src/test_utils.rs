//! Test utilities and mock factories.
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{DateTime, TimeZone, Utc};

use crate::storage::StoredExport;
use crate::traits::{MockExportRepository, MockTimeProvider};

/// Fixed reference instant used across tests.
#[must_use]
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Create a mock time provider that always returns `now`.
#[must_use]
pub fn fixed_clock(now: DateTime<Utc>) -> MockTimeProvider {
    let mut mock = MockTimeProvider::new();
    mock.expect_now().return_const(now);
    mock
}

/// Create a mock repository reporting `count` stored exports for any player.
#[must_use]
pub fn mock_repository_with_count(count: u32) -> MockExportRepository {
    let mut mock = MockExportRepository::new();
    mock.expect_count_for_player().returning(move |_| Ok(count));
    mock
}

/// Build an export with payload `data-{id}` created at `created_at`.
#[must_use]
pub fn export_created(id: &str, player_user_id: i64, created_at: DateTime<Utc>) -> StoredExport {
    StoredExport::new(id, player_user_id, format!("data-{id}")).with_created_at(created_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ExportRepository, TimeProvider};

    #[test]
    fn test_fixed_clock() {
        let clock = fixed_clock(t0());
        assert_eq!(clock.now(), t0());
        assert_eq!(clock.now(), t0());
    }

    #[tokio::test]
    async fn test_mock_repository_with_count() {
        let repo = mock_repository_with_count(3);
        assert_eq!(repo.count_for_player(1).await.unwrap(), 3);
    }

    #[test]
    fn test_export_created() {
        let export = export_created("100000000000", 42, t0());
        assert_eq!(export.serialized_data, "data-100000000000");
        assert_eq!(export.created_at, t0());
    }
}
