//! Export time-to-live.

use chrono::{DateTime, Duration, Utc};

/// Decides whether an export has outlived its time-to-live.
///
/// An export is expired once strictly more than `ttl` has elapsed since
/// creation; at exactly `ttl` it is still live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    ttl: Duration,
}

impl ExpiryPolicy {
    /// Create a policy with the given time-to-live.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// The configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether an export created at `created_at` is expired at `now`.
    #[must_use]
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(created_at) > self.ttl
    }

    /// The instant after which an export created at `created_at` expires.
    #[must_use]
    pub fn expires_at(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.ttl
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::new(Duration::hours(24))
    }
}
