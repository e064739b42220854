//! Framework-free domain types for seen-item tracking.

pub mod geometry;
pub mod id;
pub mod placeholder;
pub mod seen;
pub mod signal;
