//! In-process render surface that lays feed cards out vertically.
//!
//! Stands in for a browser document: cards stack top to bottom in
//! document order, the viewport is a window of `viewport_height` pixels at
//! `scroll_y`, and collapsed cards render at a fixed placeholder height.
//! Cards can be inserted, detached and removed between ticks to mimic a
//! virtualized feed re-rendering under the engine.

use std::fmt;

use super::card::{FeedCard, PLACEHOLDER_AVATAR_SCALE};
use super::identity;
use crate::domain::geometry::{Rect, Viewport};
use crate::domain::id::ItemId;
use crate::domain::placeholder::{HiddenPart, PartKind, PlaceholderRecord};
use crate::port::outbound::surface::{ItemPresenter, RenderSurface};

/// Default rendered height of a collapsed card.
pub const DEFAULT_PLACEHOLDER_HEIGHT: f64 = 64.0;

const CARD_WIDTH: f64 = 600.0;

/// Stable key of a card within one [`SimulatedFeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey(u64);

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card-{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    key: CardKey,
    card: FeedCard,
    attached: bool,
}

/// Vertically stacked feed of cards.
#[derive(Debug, Clone)]
pub struct SimulatedFeed {
    slots: Vec<Slot>,
    next_key: u64,
    viewport_height: f64,
    scroll_y: f64,
    /// Document offset of the first card (fixed header).
    origin: f64,
    placeholder_height: f64,
    permalink_view: bool,
}

impl SimulatedFeed {
    #[must_use]
    pub fn new(viewport_height: f64) -> Self {
        Self {
            slots: Vec::new(),
            next_key: 0,
            viewport_height,
            scroll_y: 0.0,
            origin: 0.0,
            placeholder_height: DEFAULT_PLACEHOLDER_HEIGHT,
            permalink_view: false,
        }
    }

    /// Set the document offset of the first card.
    #[must_use]
    pub fn with_origin(mut self, origin: f64) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_placeholder_height(mut self, height: f64) -> Self {
        self.placeholder_height = height;
        self
    }

    pub fn set_permalink_view(&mut self, permalink_view: bool) {
        self.permalink_view = permalink_view;
    }

    /// Append a card at the bottom of the feed.
    pub fn push(&mut self, card: FeedCard) -> CardKey {
        let key = self.allocate_key();
        self.slots.push(Slot {
            key,
            card,
            attached: true,
        });
        key
    }

    /// Insert a card above every other card, as a refreshed timeline does.
    pub fn insert_top(&mut self, card: FeedCard) -> CardKey {
        let key = self.allocate_key();
        self.slots.insert(
            0,
            Slot {
                key,
                card,
                attached: true,
            },
        );
        key
    }

    /// Detach a card without dropping it; its geometry becomes zero.
    pub fn detach(&mut self, key: CardKey) -> bool {
        match self.slot_mut(key) {
            Some(slot) => {
                slot.attached = false;
                true
            }
            None => false,
        }
    }

    /// Re-attach a previously detached card in place.
    pub fn reattach(&mut self, key: CardKey) -> bool {
        match self.slot_mut(key) {
            Some(slot) => {
                slot.attached = true;
                true
            }
            None => false,
        }
    }

    /// Drop a card entirely. Outstanding handles go stale.
    pub fn remove(&mut self, key: CardKey) -> Option<FeedCard> {
        let index = self.slots.iter().position(|slot| slot.key == key)?;
        Some(self.slots.remove(index).card)
    }

    /// Scroll so that the viewport starts at document offset `y`.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    #[must_use]
    pub fn card(&self, key: CardKey) -> Option<&FeedCard> {
        self.slots
            .iter()
            .find(|slot| slot.key == key)
            .map(|slot| &slot.card)
    }

    /// Key of the first attached card resolving to `id`.
    #[must_use]
    pub fn key_of(&self, id: &ItemId) -> Option<CardKey> {
        self.slots
            .iter()
            .find(|slot| slot.attached && identity::resolve(&slot.card).as_ref() == Some(id))
            .map(|slot| slot.key)
    }

    /// Document offset of the top edge of `key`, if attached.
    #[must_use]
    pub fn document_top(&self, key: CardKey) -> Option<f64> {
        let mut offset = self.origin;
        for slot in self.slots.iter().filter(|slot| slot.attached) {
            if slot.key == key {
                return Some(offset);
            }
            offset += self.rendered_height(&slot.card);
        }
        None
    }

    fn rendered_height(&self, card: &FeedCard) -> f64 {
        if card.placeholder {
            self.placeholder_height.min(card.height)
        } else {
            card.height
        }
    }

    fn allocate_key(&mut self) -> CardKey {
        let key = CardKey(self.next_key);
        self.next_key += 1;
        key
    }

    fn slot(&self, key: CardKey) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.key == key)
    }

    fn slot_mut(&mut self, key: CardKey) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|slot| slot.key == key)
    }

    fn attached_card_mut(&mut self, key: CardKey) -> Option<&mut FeedCard> {
        self.slot_mut(key)
            .filter(|slot| slot.attached)
            .map(|slot| &mut slot.card)
    }
}

impl RenderSurface for SimulatedFeed {
    type Handle = CardKey;

    fn viewport(&self) -> Viewport {
        Viewport {
            height: self.viewport_height,
            scroll_y: self.scroll_y,
        }
    }

    fn items(&self) -> Vec<CardKey> {
        self.slots
            .iter()
            .filter(|slot| slot.attached)
            .map(|slot| slot.key)
            .collect()
    }

    fn rect(&self, item: &CardKey) -> Rect {
        let Some(top) = self.document_top(*item) else {
            return Rect::default();
        };
        let Some(slot) = self.slot(*item) else {
            return Rect::default();
        };
        Rect::new(
            top - self.scroll_y,
            CARD_WIDTH,
            self.rendered_height(&slot.card),
        )
    }

    fn resolve_identity(&self, item: &CardKey) -> Option<ItemId> {
        self.slot(*item)
            .filter(|slot| slot.attached)
            .and_then(|slot| identity::resolve(&slot.card))
    }

    fn is_permalink_view(&self) -> bool {
        self.permalink_view
    }

    fn continues_thread(&self, item: &CardKey) -> bool {
        self.slot(*item)
            .is_some_and(|slot| slot.attached && slot.card.thread_continues)
    }

    fn is_stale(&self, item: &CardKey) -> bool {
        self.slot(*item).is_none()
    }
}

impl ItemPresenter for SimulatedFeed {
    fn is_placeholder(&self, item: &CardKey) -> bool {
        self.slot(*item).is_some_and(|slot| slot.card.placeholder)
    }

    fn collapse_visual(&mut self, item: &CardKey) -> Option<Vec<HiddenPart>> {
        let card = self.attached_card_mut(*item)?;
        if card.placeholder {
            return None;
        }

        let mut changed = Vec::new();
        for part in &mut card.parts {
            match part.kind {
                PartKind::Avatar => {
                    if part.visible && part.scale != PLACEHOLDER_AVATAR_SCALE {
                        changed.push(HiddenPart::Rescaled {
                            part: part.kind,
                            previous: part.scale,
                        });
                        part.scale = PLACEHOLDER_AVATAR_SCALE;
                    }
                }
                _ if part.visible => {
                    part.visible = false;
                    changed.push(HiddenPart::Hidden(part.kind));
                }
                _ => {}
            }
        }
        card.placeholder = true;
        Some(changed)
    }

    fn restore_visual(&mut self, record: &PlaceholderRecord<CardKey>) -> bool {
        let Some(slot) = self.slot_mut(record.handle) else {
            return false;
        };
        let card = &mut slot.card;
        for change in &record.hidden {
            match *change {
                HiddenPart::Hidden(kind) => {
                    if let Some(part) = card.part_mut(kind) {
                        part.visible = true;
                    }
                }
                HiddenPart::Rescaled { part, previous } => {
                    if let Some(part) = card.part_mut(part) {
                        part.scale = previous;
                    }
                }
            }
        }
        card.placeholder = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_of(heights: &[f64]) -> (SimulatedFeed, Vec<CardKey>) {
        let mut feed = SimulatedFeed::new(800.0);
        let keys = heights
            .iter()
            .enumerate()
            .map(|(i, height)| feed.push(FeedCard::status("alice", &format!("{}", i + 1), *height)))
            .collect();
        (feed, keys)
    }

    #[test]
    fn cards_stack_relative_to_scroll_offset() {
        let (mut feed, keys) = feed_of(&[300.0, 200.0, 400.0]);
        feed.scroll_to(350.0);

        assert_eq!(feed.rect(&keys[0]), Rect::new(-350.0, CARD_WIDTH, 300.0));
        assert_eq!(feed.rect(&keys[1]).top, -50.0);
        assert_eq!(feed.rect(&keys[2]).top, 150.0);
    }

    #[test]
    fn detached_and_removed_cards_report_zero_geometry() {
        let (mut feed, keys) = feed_of(&[300.0, 200.0]);
        feed.detach(keys[0]);
        assert_eq!(feed.rect(&keys[0]), Rect::default());
        assert_eq!(feed.rect(&keys[1]).top, 0.0);
        assert_eq!(feed.items(), vec![keys[1]]);
        assert_eq!(feed.resolve_identity(&keys[0]), None);

        assert!(!feed.is_stale(&keys[0]));

        feed.remove(keys[1]);
        assert_eq!(feed.rect(&keys[1]), Rect::default());
        assert!(feed.is_stale(&keys[1]));
    }

    #[test]
    fn insert_top_pushes_existing_cards_down() {
        let (mut feed, keys) = feed_of(&[300.0]);
        feed.insert_top(FeedCard::status("bob", "99", 250.0));
        assert_eq!(feed.rect(&keys[0]).top, 250.0);
    }

    #[test]
    fn collapse_then_restore_is_exact_inverse() {
        let (mut feed, keys) = feed_of(&[300.0]);
        if let Some(part) = feed
            .attached_card_mut(keys[0])
            .and_then(|card| card.part_mut(PartKind::Media))
        {
            part.visible = false;
        }
        let before = feed.card(keys[0]).cloned().unwrap();

        let hidden = feed.collapse_visual(&keys[0]).unwrap();
        assert!(!hidden.contains(&HiddenPart::Hidden(PartKind::Media)));
        assert!(feed.is_placeholder(&keys[0]));
        assert_eq!(feed.rect(&keys[0]).height, DEFAULT_PLACEHOLDER_HEIGHT);

        let record = PlaceholderRecord {
            handle: keys[0],
            id: ItemId::from("1"),
            hidden,
        };
        assert!(feed.restore_visual(&record));
        assert_eq!(feed.card(keys[0]), Some(&before));
    }

    #[test]
    fn collapse_is_refused_when_marker_already_applied() {
        let (mut feed, keys) = feed_of(&[300.0]);
        assert!(feed.collapse_visual(&keys[0]).is_some());
        assert!(feed.collapse_visual(&keys[0]).is_none());
    }
}
