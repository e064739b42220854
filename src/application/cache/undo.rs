//! Items the user chose to keep visible.

use std::collections::HashSet;

use crate::domain::id::ItemId;

/// Ids restored by the user after a collapse.
///
/// Entries are never expired or removed: an item restored once is never
/// auto-collapsed again for the lifetime of the owning engine.
#[derive(Debug, Default)]
pub struct UndoSet {
    ids: HashSet<ItemId>,
}

impl UndoSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a restore. Returns false if the id was already present.
    pub fn insert(&mut self, id: ItemId) -> bool {
        self.ids.insert(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
