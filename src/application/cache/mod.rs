//! Seen-item cache and the user restore set.

pub mod seen;
pub mod undo;
