//! Inbound (driving) ports consumed by inbound adapters.
//!
//! # Modules
//!
//! - [`operator`]: Operator-facing use cases for configuration, seen-store
//!   maintenance, and scripted replays

pub mod operator;
