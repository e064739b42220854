//! Seen store backed by a single JSON file.
//!
//! The file holds one array of `{ "id": ..., "expire_at": <epoch ms> }`
//! objects. Every operation rewrites the whole blob, so it suits the small
//! working sets a seen cache holds.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::id::ItemId;
use crate::domain::seen::{from_epoch_millis, to_epoch_millis, SeenRecord};
use crate::error::StoreError;
use crate::port::outbound::store::{ScanSummary, SeenStore, Visit};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlobEntry {
    id: String,
    expire_at: i64,
}

pub struct JsonBlobStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonBlobStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every well-formed entry. A missing, malformed or non-array file
    /// reads as empty.
    fn read(&self) -> Result<Vec<SeenRecord>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(StoreError::Io(error)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<BlobEntry> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "Ignoring malformed seen blob"
                );
                return Ok(Vec::new());
            }
        };

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                from_epoch_millis(entry.expire_at).map(|expires_at| SeenRecord {
                    id: ItemId::from(entry.id),
                    expires_at,
                })
            })
            .collect())
    }

    /// Replace the file atomically via a sibling temp file.
    fn write(&self, records: &[SeenRecord]) -> Result<(), StoreError> {
        let entries: Vec<BlobEntry> = records
            .iter()
            .map(|record| BlobEntry {
                id: record.id.as_str().to_string(),
                expire_at: to_epoch_millis(record.expires_at),
            })
            .collect();
        let payload = serde_json::to_vec(&entries).map_err(StoreError::Encode)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StoreError::Io)?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload).map_err(StoreError::Io)?;
        fs::rename(&staging, &self.path).map_err(StoreError::Io)
    }
}

impl SeenStore for JsonBlobStore {
    fn scan(
        &self,
        visit: &mut dyn FnMut(&SeenRecord) -> Visit,
    ) -> Result<ScanSummary, StoreError> {
        let _guard = self.lock.lock();
        let records = self.read()?;
        let mut summary = ScanSummary::default();
        let mut kept = Vec::with_capacity(records.len());

        for record in records {
            summary.visited += 1;
            match visit(&record) {
                Visit::Keep => kept.push(record),
                Visit::Delete => summary.deleted += 1,
            }
        }
        if summary.deleted > 0 {
            self.write(&kept)?;
        }
        Ok(summary)
    }

    fn upsert(&self, records: &[SeenRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let _guard = self.lock.lock();
        let mut stored = self.read()?;
        for record in records {
            match stored.iter_mut().find(|existing| existing.id == record.id) {
                Some(existing) => existing.expires_at = record.expires_at,
                None => stored.push(record.clone()),
            }
        }
        self.write(&stored)
    }

    fn remove(&self, id: &ItemId) -> Result<bool, StoreError> {
        let _guard = self.lock.lock();
        let mut stored = self.read()?;
        let before = stored.len();
        stored.retain(|record| record.id != *id);
        if stored.len() == before {
            return Ok(false);
        }
        self.write(&stored)?;
        Ok(true)
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let _guard = self.lock.lock();
        let count = self.read()?.len();
        self.write(&[])?;
        Ok(count)
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }
}
