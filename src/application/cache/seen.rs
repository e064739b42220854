//! In-memory seen cache with write-back to a [`SeenStore`].
//!
//! The cache is the single source of truth during a session. The store is
//! written according to a [`PersistencePolicy`] and read back only by an
//! explicit [`SeenCache::load`], which happens at start and on refocus.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::undo::UndoSet;
use crate::domain::id::ItemId;
use crate::domain::seen::{ttl_from_days, SeenRecord, DEFAULT_TTL_DAYS};
use crate::port::outbound::store::{ScanSummary, SeenStore, Visit};

const fn default_ttl_days() -> u32 {
    DEFAULT_TTL_DAYS
}

const fn default_batch_size() -> usize {
    10
}

/// When newly seen records are written to the store.
///
/// Every policy also flushes on blur, hide and stop, so a normal close is
/// durable and an abnormal termination loses at most the unflushed queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PersistencePolicy {
    /// Write-through on every insert.
    Immediate,
    /// Flush after every `batch_size` insertions.
    Batched {
        #[serde(default = "default_batch_size")]
        batch_size: usize,
    },
    /// Flush only when the hosting context blurs, hides or stops.
    OnBlur,
}

impl Default for PersistencePolicy {
    fn default() -> Self {
        Self::Batched {
            batch_size: default_batch_size(),
        }
    }
}

/// Seen cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SeenCacheConfig {
    /// Lifetime of a seen record in days. Defaults to 7.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,

    /// Write policy for newly seen records.
    #[serde(default)]
    pub persistence: PersistencePolicy,
}

impl Default for SeenCacheConfig {
    fn default() -> Self {
        Self {
            ttl_days: default_ttl_days(),
            persistence: PersistencePolicy::default(),
        }
    }
}

/// Outcome of a [`SeenCache::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Persisted records that were still live.
    pub kept: usize,
    /// Expired records deleted from the store.
    pub deleted: usize,
}

/// TTL-keyed record of items the user has already read.
pub struct SeenCache {
    /// Item id to expiry time.
    entries: HashMap<ItemId, DateTime<Utc>>,
    /// Ids the user restored; never auto-collapsed again.
    undo: UndoSet,
    /// Records waiting to be written to the store.
    pending: Vec<SeenRecord>,
    store: Arc<dyn SeenStore>,
    policy: PersistencePolicy,
    ttl: Duration,
}

impl SeenCache {
    #[must_use]
    pub fn new(store: Arc<dyn SeenStore>, config: &SeenCacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            undo: UndoSet::new(),
            pending: Vec::new(),
            store,
            policy: config.persistence,
            ttl: ttl_from_days(config.ttl_days),
        }
    }

    /// Configured record lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read the store, deleting expired rows and merging live ones.
    ///
    /// Safe to call repeatedly: records written by another session since
    /// the last load are absorbed. On conflict the later expiry wins, and
    /// in-memory entries missing from the store are kept.
    pub fn load(&mut self, now: DateTime<Utc>) -> LoadSummary {
        let mut live = Vec::new();
        let scanned = self.store.scan(&mut |record: &SeenRecord| {
            if record.is_expired(now) {
                Visit::Delete
            } else {
                live.push(record.clone());
                Visit::Keep
            }
        });

        let ScanSummary { visited, deleted } = match scanned {
            Ok(summary) => summary,
            Err(error) => {
                warn!(
                    backend = self.store.backend_name(),
                    error = %error,
                    "Failed to load seen cache; continuing with in-memory state"
                );
                return LoadSummary::default();
            }
        };

        for record in live {
            let slot = self.entries.entry(record.id).or_insert(record.expires_at);
            if *slot < record.expires_at {
                *slot = record.expires_at;
            }
        }
        self.purge_expired(now);

        let summary = LoadSummary {
            kept: visited.saturating_sub(deleted),
            deleted,
        };
        info!(
            backend = self.store.backend_name(),
            kept = summary.kept,
            deleted = summary.deleted,
            "Loaded seen cache"
        );
        summary
    }

    /// Record `id` as seen until `now + ttl` and schedule persistence.
    ///
    /// A `None` id is ignored. Returns whether a record was written to the
    /// in-memory cache. Storage failures are logged, never returned.
    pub fn mark_seen(&mut self, id: Option<ItemId>, ttl: Duration, now: DateTime<Utc>) -> bool {
        let Some(id) = id else {
            return false;
        };
        if ttl <= Duration::zero() {
            warn!(id = %id, "Ignoring seen record with non-positive ttl");
            return false;
        }

        let Some(record) = SeenRecord::try_new(id.clone(), now, ttl) else {
            warn!(
                id = %id,
                ttl_secs = ttl.num_seconds(),
                "Ignoring seen record with out-of-range expiry"
            );
            return false;
        };
        debug!(id = %record.id, expires_at = %record.expires_at, "Marked seen");
        self.entries.insert(record.id.clone(), record.expires_at);
        self.pending.push(record);

        let due = match self.policy {
            PersistencePolicy::Immediate => true,
            PersistencePolicy::Batched { batch_size } => self.pending.len() >= batch_size,
            PersistencePolicy::OnBlur => false,
        };
        if due {
            self.purge_expired(now);
            self.flush();
        }
        true
    }

    /// True when `id` is live and the user has not restored it.
    #[must_use]
    pub fn has(&self, id: &ItemId, now: DateTime<Utc>) -> bool {
        self.entries.get(id).is_some_and(|expires_at| *expires_at > now) && !self.undo.contains(id)
    }

    /// Exempt `id` from auto-collapse for the rest of the session.
    pub fn restore(&mut self, id: ItemId) -> bool {
        self.undo.insert(id)
    }

    /// True when the user restored `id` during this session.
    #[must_use]
    pub fn is_restored(&self, id: &ItemId) -> bool {
        self.undo.contains(id)
    }

    /// Write every queued record to the store.
    ///
    /// Returns the number of records written. A failed write is logged and
    /// its records are dropped from the queue; the in-memory entries stay.
    pub fn flush(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let batch = std::mem::take(&mut self.pending);
        match self.store.upsert(&batch) {
            Ok(()) => {
                debug!(
                    backend = self.store.backend_name(),
                    count = batch.len(),
                    "Flushed seen records"
                );
                batch.len()
            }
            Err(error) => {
                warn!(
                    backend = self.store.backend_name(),
                    count = batch.len(),
                    error = %error,
                    "Failed to persist seen records"
                );
                0
            }
        }
    }

    /// Drop in-memory entries whose expiry has passed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at > now);
        before - self.entries.len()
    }

    /// Expiry of `id`, if cached.
    #[must_use]
    pub fn expires_at(&self, id: &ItemId) -> Option<DateTime<Utc>> {
        self.entries.get(id).copied()
    }

    /// Number of cached entries, expired ones included until purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records waiting for a flush.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
