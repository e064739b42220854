//! Seen-store maintenance projections for operator-facing adapters.

use chrono::{DateTime, Utc};

use crate::error::Result;

/// One persisted seen record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenEntryView {
    pub id: String,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,
}

/// Listing of the configured store.
#[derive(Debug, Clone)]
pub struct SeenListing {
    pub backend: String,
    pub entries: Vec<SeenEntryView>,
}

/// Outcome of `seen prune`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub kept: usize,
    pub deleted: usize,
}

/// Seen-store maintenance use-cases.
///
/// Every call opens the store named by the given configuration.
pub trait SeenOperator: Send + Sync {
    /// List stored records, earliest expiry first.
    fn list_seen(&self, config_toml: &str) -> Result<SeenListing>;

    /// Delete expired records.
    fn prune_seen(&self, config_toml: &str) -> Result<PruneReport>;

    /// Delete one record. Returns whether it existed.
    fn forget_seen(&self, config_toml: &str, id: &str) -> Result<bool>;

    /// Delete every record. Returns the number deleted.
    fn clear_seen(&self, config_toml: &str) -> Result<usize>;
}
