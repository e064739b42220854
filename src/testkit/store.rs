//! Store doubles.

use crate::domain::id::ItemId;
use crate::domain::seen::SeenRecord;
use crate::error::StoreError;
use crate::port::outbound::store::{ScanSummary, SeenStore, Visit};

/// Store whose every operation fails, for exercising degraded persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "store unavailable",
    ))
}

impl SeenStore for FailingStore {
    fn scan(
        &self,
        _visit: &mut dyn FnMut(&SeenRecord) -> Visit,
    ) -> Result<ScanSummary, StoreError> {
        Err(unavailable())
    }

    fn upsert(&self, _records: &[SeenRecord]) -> Result<(), StoreError> {
        Err(StoreError::Query("disk full".to_string()))
    }

    fn remove(&self, _id: &ItemId) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    fn clear(&self) -> Result<usize, StoreError> {
        Err(unavailable())
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
