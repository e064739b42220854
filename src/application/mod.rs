//! Application services (use cases).
//!
//! These services hold the seen-tracking logic and drive the outbound ports.

pub mod cache;
pub mod engine;
pub mod placeholder;
pub mod scanner;
pub mod throttle;
