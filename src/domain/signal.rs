//! Inputs consumed by the engine and the events it emits.

use super::id::ItemId;

/// An event from the hosting context.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// The document scrolled to `position` (pixels from the top).
    Scroll { position: f64 },
    /// The hosting context regained focus; the cache is reloaded first.
    Focus,
    /// Periodic timer tick.
    Interval,
    /// The hosting context lost focus.
    Blur,
    /// The hosting context is being hidden or closed.
    Hide,
    /// The user asked to see a collapsed item again.
    Restore(ItemId),
}

/// Observable outcome of processing a signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// An item fully exited the viewport and was recorded as seen.
    Seen(ItemId),
    /// An item was folded into a placeholder.
    Collapsed(ItemId),
    /// A placeholder was expanded back by the user.
    Restored(ItemId),
}
