//! In-memory seen store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::id::ItemId;
use crate::domain::seen::SeenRecord;
use crate::error::StoreError;
use crate::port::outbound::store::{ScanSummary, SeenStore, Visit};

/// Volatile store for tests and sessions that need no durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<ItemId, DateTime<Utc>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a record directly, bypassing the port.
    pub fn insert(&self, record: SeenRecord) {
        self.records.write().insert(record.id, record.expires_at);
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<DateTime<Utc>> {
        self.records.read().get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl SeenStore for MemoryStore {
    fn scan(
        &self,
        visit: &mut dyn FnMut(&SeenRecord) -> Visit,
    ) -> Result<ScanSummary, StoreError> {
        let mut records = self.records.write();
        let mut summary = ScanSummary::default();
        records.retain(|id, expires_at| {
            summary.visited += 1;
            let record = SeenRecord {
                id: id.clone(),
                expires_at: *expires_at,
            };
            match visit(&record) {
                Visit::Keep => true,
                Visit::Delete => {
                    summary.deleted += 1;
                    false
                }
            }
        });
        Ok(summary)
    }

    fn upsert(&self, records: &[SeenRecord]) -> Result<(), StoreError> {
        let mut stored = self.records.write();
        for record in records {
            stored.insert(record.id.clone(), record.expires_at);
        }
        Ok(())
    }

    fn remove(&self, id: &ItemId) -> Result<bool, StoreError> {
        Ok(self.records.write().remove(id).is_some())
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut records = self.records.write();
        let count = records.len();
        records.clear();
        Ok(count)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn scan_deletes_only_marked_rows() {
        let store = MemoryStore::new();
        store.insert(SeenRecord::new(ItemId::from("a"), t0(), Duration::days(1)));
        store.insert(SeenRecord::new(ItemId::from("b"), t0(), Duration::days(9)));

        let summary = store
            .scan(&mut |record| {
                if record.is_expired(t0() + Duration::days(2)) {
                    Visit::Delete
                } else {
                    Visit::Keep
                }
            })
            .unwrap();

        assert_eq!(summary, ScanSummary { visited: 2, deleted: 1 });
        assert!(store.get(&ItemId::from("a")).is_none());
        assert!(store.get(&ItemId::from("b")).is_some());
    }

    #[test]
    fn upsert_replaces_by_id() {
        let store = MemoryStore::new();
        let id = ItemId::from("a");
        store.upsert(&[SeenRecord::new(id.clone(), t0(), Duration::days(1))]).unwrap();
        store.upsert(&[SeenRecord::new(id.clone(), t0(), Duration::days(3))]).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id), Some(t0() + Duration::days(3)));
    }

    #[test]
    fn remove_and_clear_report_what_they_dropped() {
        let store = MemoryStore::new();
        store.insert(SeenRecord::new(ItemId::from("a"), t0(), Duration::days(1)));
        store.insert(SeenRecord::new(ItemId::from("b"), t0(), Duration::days(1)));

        assert!(store.remove(&ItemId::from("a")).unwrap());
        assert!(!store.remove(&ItemId::from("a")).unwrap());
        assert_eq!(store.clear().unwrap(), 1);
        assert!(store.is_empty());
    }
}
