//! Render-surface ports.
//!
//! The engine never owns rendered items. It holds handles, which are
//! non-owning keys into the surface, and must tolerate them going stale
//! between ticks: a detached handle reports an all-zero [`Rect`].

use std::fmt::Debug;
use std::hash::Hash;

use crate::domain::geometry::{Rect, Viewport};
use crate::domain::id::ItemId;
use crate::domain::placeholder::{HiddenPart, PlaceholderRecord};

/// Read-only queries against the externally rendered feed.
pub trait RenderSurface {
    /// Non-owning reference to one rendered item.
    type Handle: Clone + Eq + Hash + Debug;

    /// Current viewport geometry.
    fn viewport(&self) -> Viewport;

    /// Currently rendered items, in top-to-bottom document order.
    fn items(&self) -> Vec<Self::Handle>;

    /// Bounding rectangle of `item`; all zeros when detached.
    fn rect(&self, item: &Self::Handle) -> Rect;

    /// Resolve the identity embedded in the item's markup.
    ///
    /// Returns `None` when the identity-bearing reference cannot be found.
    fn resolve_identity(&self, item: &Self::Handle) -> Option<ItemId>;

    /// True when the view is focused on a single item (a permalink page).
    fn is_permalink_view(&self) -> bool;

    /// True when the item's reply thread continues into the next item.
    fn continues_thread(&self, item: &Self::Handle) -> bool;

    /// True once `item` refers to nothing on the surface. A detached item
    /// is not stale: it may be attached again.
    fn is_stale(&self, item: &Self::Handle) -> bool;
}

/// Visual mutations used by the placeholder state machine.
///
/// Kept separate from [`RenderSurface`] so the fragile structural
/// assumptions about item markup stay inside one adapter.
pub trait ItemPresenter: RenderSurface {
    /// True when the collapse marker is already applied to `item`.
    fn is_placeholder(&self, item: &Self::Handle) -> bool;

    /// Fold `item` into a placeholder.
    ///
    /// Returns the parts that were changed, or `None` when the item is
    /// detached or already collapsed.
    fn collapse_visual(&mut self, item: &Self::Handle) -> Option<Vec<HiddenPart>>;

    /// Undo a collapse exactly. Returns false when the handle is gone.
    fn restore_visual(&mut self, record: &PlaceholderRecord<Self::Handle>) -> bool;
}
