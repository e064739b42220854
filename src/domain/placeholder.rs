//! Collapse state and the bookkeeping needed to undo a collapse.

use std::fmt;

use super::id::ItemId;

/// Visual sub-part of an item that a collapse may hide or restyle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// Top margin spacer above the header.
    Spacer,
    /// Author avatar; shrunk rather than hidden.
    Avatar,
    /// Secondary header details (timestamp, badges, menu).
    HeaderDetail,
    /// Text body.
    Body,
    /// Attached media.
    Media,
    /// Reply/repost/like action bar.
    Actions,
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spacer => "spacer",
            Self::Avatar => "avatar",
            Self::HeaderDetail => "header-detail",
            Self::Body => "body",
            Self::Media => "media",
            Self::Actions => "actions",
        };
        f.write_str(name)
    }
}

/// A sub-part changed by a collapse, with enough state to revert it.
#[derive(Debug, Clone, PartialEq)]
pub enum HiddenPart {
    /// The part was visible and is now hidden.
    Hidden(PartKind),
    /// The part was rescaled; holds the previous scale factor.
    Rescaled { part: PartKind, previous: f32 },
}

/// Per-item collapse state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemState {
    #[default]
    Visible,
    Collapsed,
}

/// Transient record created when an item collapses, destroyed on restore.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderRecord<H> {
    pub handle: H,
    pub id: ItemId,
    pub hidden: Vec<HiddenPart>,
}
