//! Persistence port for seen records.

use crate::domain::id::ItemId;
use crate::domain::seen::SeenRecord;
use crate::error::StoreError;

/// Decision returned by a [`SeenStore::scan`] visitor for each stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Keep,
    Delete,
}

/// Counts reported by a completed scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Rows handed to the visitor.
    pub visited: usize,
    /// Rows the visitor asked to delete.
    pub deleted: usize,
}

/// Durable key→expiry storage.
///
/// Used only as an I/O sink and source: the in-memory cache is authoritative
/// at runtime and reads the store again only on an explicit load.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so that writes can be handed to a
/// background task (see `WriteBehindStore`).
pub trait SeenStore: Send + Sync {
    /// Visit every stored record, deleting the rows the visitor marks
    /// [`Visit::Delete`].
    ///
    /// Implementations that cannot make sense of their persisted payload
    /// treat it as empty rather than failing.
    fn scan(&self, visit: &mut dyn FnMut(&SeenRecord) -> Visit)
        -> Result<ScanSummary, StoreError>;

    /// Insert or replace records by id.
    fn upsert(&self, records: &[SeenRecord]) -> Result<(), StoreError>;

    /// Remove a single record. Returns whether it existed.
    fn remove(&self, id: &ItemId) -> Result<bool, StoreError>;

    /// Remove every record. Returns the number removed.
    fn clear(&self) -> Result<usize, StoreError>;

    /// Short backend name for logs and operator output.
    fn backend_name(&self) -> &'static str;
}
