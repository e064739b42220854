//! Per-item collapse/restore state machine.
//!
//! ```text
//! Visible --(below collapse line, seen, not restored)--> Collapsed
//! Collapsed --Restore(id)--> Visible, id added to the undo set for good
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::cache::seen::SeenCache;
use crate::domain::geometry::Viewport;
use crate::domain::id::ItemId;
use crate::domain::placeholder::{ItemState, PlaceholderRecord};
use crate::port::outbound::surface::ItemPresenter;

const fn default_above_margin_px() -> f64 {
    100.0
}

const fn default_below_margin_px() -> f64 {
    50.0
}

const fn default_true() -> bool {
    true
}

/// Collapse pass settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceholderConfig {
    /// Distance above the scroll offset that still counts as on-screen
    /// near the top of the document. Defaults to 100.
    #[serde(default = "default_above_margin_px")]
    pub above_margin_px: f64,

    /// Distance below the viewport bottom that still counts as on-screen.
    /// Defaults to 50.
    #[serde(default = "default_below_margin_px")]
    pub below_margin_px: f64,

    /// Hold back a reply-chain parent until its child collapsed.
    #[serde(default = "default_true")]
    pub reply_chain_guard: bool,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            above_margin_px: default_above_margin_px(),
            below_margin_px: default_below_margin_px(),
            reply_chain_guard: true,
        }
    }
}

pub struct PlaceholderMachine<H> {
    config: PlaceholderConfig,
    /// Live placeholders keyed by handle.
    records: HashMap<H, PlaceholderRecord<H>>,
    /// Reply-chain parents whose child has collapsed.
    child_collapsed: HashSet<ItemId>,
}

impl<H> PlaceholderMachine<H>
where
    H: Clone + Eq + Hash + Debug,
{
    #[must_use]
    pub fn new(config: PlaceholderConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
            child_collapsed: HashSet::new(),
        }
    }

    /// Items whose top edge is below this viewport-relative line may collapse.
    #[must_use]
    pub fn collapse_line(&self, viewport: Viewport) -> f64 {
        (viewport.scroll_y - self.config.above_margin_px)
            .min(viewport.height + self.config.below_margin_px)
    }

    #[must_use]
    pub fn state(&self, handle: &H) -> ItemState {
        if self.records.contains_key(handle) {
            ItemState::Collapsed
        } else {
            ItemState::Visible
        }
    }

    /// Number of live placeholders.
    #[must_use]
    pub fn collapsed_count(&self) -> usize {
        self.records.len()
    }

    /// Collapse every qualifying candidate. Returns the collapsed ids.
    ///
    /// `candidates` must be in top-to-bottom order. Already collapsed items
    /// are left untouched, so running the pass twice equals running it once.
    pub fn collapse_pass<P>(
        &mut self,
        presenter: &mut P,
        candidates: &[H],
        cache: &SeenCache,
        now: DateTime<Utc>,
    ) -> Vec<ItemId>
    where
        P: ItemPresenter<Handle = H>,
    {
        // Detached cards keep their record so a reattached placeholder can
        // still be restored.
        self.records.retain(|handle, _| !presenter.is_stale(handle));

        let line = self.collapse_line(presenter.viewport());
        // The item a permalink view was opened for stays expanded.
        let start = usize::from(presenter.is_permalink_view());
        let mut collapsed = Vec::new();

        for index in start..candidates.len() {
            let handle = &candidates[index];
            let Some(id) = presenter.resolve_identity(handle) else {
                continue;
            };
            if self.records.contains_key(handle) || presenter.is_placeholder(handle) {
                continue;
            }
            if presenter.rect(handle).top <= line || !cache.has(&id, now) {
                continue;
            }
            if self.config.reply_chain_guard
                && presenter.continues_thread(handle)
                && !self.child_collapsed.contains(&id)
            {
                debug!(id = %id, "Holding reply-chain parent until its child collapses");
                continue;
            }

            let Some(hidden) = presenter.collapse_visual(handle) else {
                continue;
            };
            // The parent is taken to be the candidate directly above. When
            // the child is the first candidate its parent is not flagged.
            if self.config.reply_chain_guard && index > 0 {
                let parent = &candidates[index - 1];
                if presenter.continues_thread(parent) {
                    if let Some(parent_id) = presenter.resolve_identity(parent) {
                        self.child_collapsed.insert(parent_id);
                    }
                }
            }

            debug!(id = %id, parts = hidden.len(), "Collapsed item");
            self.records.insert(
                handle.clone(),
                PlaceholderRecord {
                    handle: handle.clone(),
                    id: id.clone(),
                    hidden,
                },
            );
            collapsed.push(id);
        }

        collapsed
    }

    /// Expand every live placeholder for `id`.
    ///
    /// Returns true when at least one placeholder was restored.
    pub fn restore<P>(&mut self, presenter: &mut P, id: &ItemId) -> bool
    where
        P: ItemPresenter<Handle = H>,
    {
        let handles: Vec<H> = self
            .records
            .iter()
            .filter(|(_, record)| record.id == *id)
            .map(|(handle, _)| handle.clone())
            .collect();

        let mut restored = false;
        for handle in handles {
            if let Some(record) = self.records.remove(&handle) {
                restored |= presenter.restore_visual(&record);
            }
        }
        if restored {
            debug!(id = %id, "Restored item");
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::adapter::outbound::feed::card::FeedCard;
    use crate::adapter::outbound::feed::surface::SimulatedFeed;
    use crate::adapter::outbound::memory::MemoryStore;
    use crate::application::cache::seen::SeenCacheConfig;
    use crate::port::outbound::surface::RenderSurface;
    use crate::testkit::feed::stacked_feed;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn cache_seeing(ids: &[&str]) -> SeenCache {
        let mut cache = SeenCache::new(Arc::new(MemoryStore::new()), &SeenCacheConfig::default());
        for id in ids {
            cache.mark_seen(Some(ItemId::from(*id)), Duration::days(7), now());
        }
        cache
    }

    fn machine() -> PlaceholderMachine<crate::adapter::outbound::feed::surface::CardKey> {
        PlaceholderMachine::new(PlaceholderConfig::default())
    }

    #[test]
    fn collapse_line_takes_the_tighter_bound() {
        let machine = machine();
        let near_top = Viewport { height: 800.0, scroll_y: 0.0 };
        let deep = Viewport { height: 800.0, scroll_y: 5_000.0 };
        assert_eq!(machine.collapse_line(near_top), -100.0);
        assert_eq!(machine.collapse_line(deep), 850.0);
    }

    #[test]
    fn only_seen_items_below_the_line_collapse() {
        let (mut feed, keys) = stacked_feed(800.0, &[300.0, 300.0, 300.0, 300.0]);
        let cache = cache_seeing(&["1", "4"]);
        let mut machine = machine();
        let candidates = feed.items();

        let collapsed = machine.collapse_pass(&mut feed, &candidates, &cache, now());

        // line is -100 at the top of the document, so every seen card qualifies
        assert_eq!(collapsed, vec![ItemId::from("1"), ItemId::from("4")]);
        assert_eq!(machine.state(&keys[0]), ItemState::Collapsed);
        assert_eq!(machine.state(&keys[1]), ItemState::Visible);
    }

    #[test]
    fn items_inside_the_viewport_stay_expanded_when_scrolled_deep() {
        let (mut feed, keys) = stacked_feed(800.0, &[400.0; 20]);
        feed.scroll_to(4_000.0);
        let cache = cache_seeing(&["11", "14"]);
        let mut machine = machine();
        let candidates = feed.items();

        // card 11 sits at the viewport top, card 14 starts 1200px below it
        let collapsed = machine.collapse_pass(&mut feed, &candidates, &cache, now());
        assert_eq!(collapsed, vec![ItemId::from("14")]);
        assert_eq!(machine.state(&keys[10]), ItemState::Visible);
    }

    #[test]
    fn collapse_pass_is_idempotent() {
        let (mut feed, keys) = stacked_feed(800.0, &[300.0, 300.0]);
        let cache = cache_seeing(&["2"]);
        let mut machine = machine();
        let candidates = feed.items();

        assert_eq!(machine.collapse_pass(&mut feed, &candidates, &cache, now()).len(), 1);
        let after_first = feed.card(keys[1]).cloned();
        assert!(machine.collapse_pass(&mut feed, &candidates, &cache, now()).is_empty());
        assert_eq!(feed.card(keys[1]).cloned(), after_first);
        assert_eq!(machine.collapsed_count(), 1);
    }

    #[test]
    fn permalink_view_exempts_the_top_item() {
        let (mut feed, keys) = stacked_feed(800.0, &[300.0, 300.0]);
        feed.set_permalink_view(true);
        let cache = cache_seeing(&["1", "2"]);
        let mut machine = machine();
        let candidates = feed.items();

        machine.collapse_pass(&mut feed, &candidates, &cache, now());
        assert_eq!(machine.state(&keys[0]), ItemState::Visible);
        assert_eq!(machine.state(&keys[1]), ItemState::Collapsed);
    }

    #[test]
    fn restore_reverses_collapse_and_forgets_the_record() {
        let (mut feed, keys) = stacked_feed(800.0, &[300.0]);
        let before = feed.card(keys[0]).cloned();
        let cache = cache_seeing(&["1"]);
        let mut machine = machine();
        let candidates = feed.items();
        machine.collapse_pass(&mut feed, &candidates, &cache, now());

        assert!(machine.restore(&mut feed, &ItemId::from("1")));
        assert_eq!(feed.card(keys[0]).cloned(), before);
        assert_eq!(machine.state(&keys[0]), ItemState::Visible);
        assert!(!machine.restore(&mut feed, &ItemId::from("1")));
    }

    #[test]
    fn reply_chain_parent_waits_for_its_child() {
        let mut feed = SimulatedFeed::new(800.0);
        let parent = feed.push(FeedCard::status("alice", "10", 300.0).with_thread());
        let child = feed.push(FeedCard::status("bob", "11", 300.0));
        let cache = cache_seeing(&["10", "11"]);
        let mut machine = machine();

        let candidates = feed.items();
        let first = machine.collapse_pass(&mut feed, &candidates, &cache, now());
        assert_eq!(first, vec![ItemId::from("11")]);
        assert_eq!(machine.state(&parent), ItemState::Visible);
        assert_eq!(machine.state(&child), ItemState::Collapsed);

        let candidates = feed.items();
        let second = machine.collapse_pass(&mut feed, &candidates, &cache, now());
        assert_eq!(second, vec![ItemId::from("10")]);
    }

    #[test]
    fn reply_chain_parent_is_not_flagged_when_child_leads_the_scan() {
        let mut feed = SimulatedFeed::new(800.0);
        let parent = feed.push(FeedCard::status("alice", "10", 300.0).with_thread());
        feed.push(FeedCard::status("bob", "11", 300.0));
        let cache = cache_seeing(&["10", "11"]);
        let mut machine = machine();

        // the scan started at the child, so the parent above it was trimmed
        let child_only = feed.items().split_off(1);
        machine.collapse_pass(&mut feed, &child_only, &cache, now());

        let candidates = feed.items();
        machine.collapse_pass(&mut feed, &candidates, &cache, now());
        assert_eq!(machine.state(&parent), ItemState::Visible);
    }

    #[test]
    fn disabled_guard_collapses_parents_immediately() {
        let mut feed = SimulatedFeed::new(800.0);
        feed.push(FeedCard::status("alice", "10", 300.0).with_thread());
        feed.push(FeedCard::status("bob", "11", 300.0));
        let cache = cache_seeing(&["10", "11"]);
        let mut machine = PlaceholderMachine::new(PlaceholderConfig {
            reply_chain_guard: false,
            ..PlaceholderConfig::default()
        });

        let candidates = feed.items();
        assert_eq!(machine.collapse_pass(&mut feed, &candidates, &cache, now()).len(), 2);
    }

    #[test]
    fn records_survive_detach_and_restore_after_reattach() {
        let (mut feed, keys) = stacked_feed(800.0, &[300.0, 300.0]);
        let before = feed.card(keys[0]).cloned();
        let cache = cache_seeing(&["1"]);
        let mut machine = machine();
        let candidates = feed.items();
        machine.collapse_pass(&mut feed, &candidates, &cache, now());

        feed.detach(keys[0]);
        let candidates = feed.items();
        machine.collapse_pass(&mut feed, &candidates, &cache, now());
        assert_eq!(machine.state(&keys[0]), ItemState::Collapsed);

        feed.reattach(keys[0]);
        assert!(machine.restore(&mut feed, &ItemId::from("1")));
        assert_eq!(feed.card(keys[0]).cloned(), before);
        assert!(!feed.is_placeholder(&keys[0]));
    }

    #[test]
    fn records_of_removed_items_are_dropped() {
        let (mut feed, keys) = stacked_feed(800.0, &[300.0, 300.0]);
        let cache = cache_seeing(&["1"]);
        let mut machine = machine();
        let candidates = feed.items();
        machine.collapse_pass(&mut feed, &candidates, &cache, now());
        assert_eq!(machine.collapsed_count(), 1);

        feed.remove(keys[0]);
        let candidates = feed.items();
        machine.collapse_pass(&mut feed, &candidates, &cache, now());
        assert_eq!(machine.collapsed_count(), 0);
    }
}
