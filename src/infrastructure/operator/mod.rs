//! Operator implementations for inbound adapters.

pub mod config;
pub mod entry;
pub mod replay;
pub mod seen;

mod shared;
