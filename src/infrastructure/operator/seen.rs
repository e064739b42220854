//! Seen-store maintenance operator implementation.

use std::sync::Arc;

use tracing::info;

use crate::domain::id::ItemId;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::factory::store::open_store;
use crate::port::inbound::operator::seen::{
    PruneReport, SeenEntryView, SeenListing, SeenOperator,
};
use crate::port::outbound::clock::{Clock, SystemClock};
use crate::port::outbound::store::{ScanSummary, SeenStore, Visit};

use super::entry::Operator;

fn configured_store(config_toml: &str) -> Result<Arc<dyn SeenStore>> {
    let config = Config::parse_toml(config_toml)?;
    open_store(&config.store)
}

fn prune_report(summary: ScanSummary) -> PruneReport {
    PruneReport {
        kept: summary.visited.saturating_sub(summary.deleted),
        deleted: summary.deleted,
    }
}

impl SeenOperator for Operator {
    fn list_seen(&self, config_toml: &str) -> Result<SeenListing> {
        let store = configured_store(config_toml)?;
        let now = SystemClock.now();

        let mut entries = Vec::new();
        store.scan(&mut |record| {
            entries.push(SeenEntryView {
                id: record.id.as_str().to_string(),
                expires_at: record.expires_at,
                expired: record.is_expired(now),
            });
            Visit::Keep
        })?;
        entries.sort_by(|a, b| a.expires_at.cmp(&b.expires_at).then_with(|| a.id.cmp(&b.id)));

        Ok(SeenListing {
            backend: store.backend_name().to_string(),
            entries,
        })
    }

    fn prune_seen(&self, config_toml: &str) -> Result<PruneReport> {
        let store = configured_store(config_toml)?;
        let now = SystemClock.now();

        let summary = store.scan(&mut |record| {
            if record.is_expired(now) {
                Visit::Delete
            } else {
                Visit::Keep
            }
        })?;
        info!(
            backend = store.backend_name(),
            deleted = summary.deleted,
            "Pruned expired seen records"
        );

        Ok(prune_report(summary))
    }

    fn forget_seen(&self, config_toml: &str, id: &str) -> Result<bool> {
        let store = configured_store(config_toml)?;
        Ok(store.remove(&ItemId::new(id))?)
    }

    fn clear_seen(&self, config_toml: &str) -> Result<usize> {
        let store = configured_store(config_toml)?;
        let removed = store.clear()?;
        info!(backend = store.backend_name(), removed, "Cleared seen store");
        Ok(removed)
    }
}
