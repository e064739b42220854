//! Seen records and time-to-live arithmetic.

use chrono::{DateTime, Duration, Utc};

use super::id::ItemId;

/// Default lifetime of a seen record.
pub const DEFAULT_TTL_DAYS: u32 = 7;

/// A persisted "this item has been read" marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRecord {
    pub id: ItemId,
    pub expires_at: DateTime<Utc>,
}

impl SeenRecord {
    /// Create a record that expires `ttl` after `now`.
    ///
    /// # Panics
    ///
    /// Panics when `now + ttl` is not a representable time; use
    /// [`SeenRecord::try_new`] for untrusted TTLs.
    #[must_use]
    pub fn new(id: ItemId, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id,
            expires_at: now + ttl,
        }
    }

    /// Like [`SeenRecord::new`], but `None` when the expiry overflows.
    #[must_use]
    pub fn try_new(id: ItemId, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;
        Some(Self { id, expires_at })
    }

    /// Records with `expires_at <= now` are logically absent.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Convert a TTL expressed in days into a duration.
#[must_use]
pub fn ttl_from_days(days: u32) -> Duration {
    Duration::days(i64::from(days))
}

/// Epoch milliseconds used by the persisted formats.
#[must_use]
pub fn to_epoch_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Inverse of [`to_epoch_millis`]. Out-of-range values yield `None`.
#[must_use]
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}
