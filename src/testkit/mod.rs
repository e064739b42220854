//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`clock`]: `ManualClock`, a clock that only moves when told to.
//! - [`feed`]: Builders for simulated feeds of stacked cards.
//! - [`store`]: Store doubles such as `FailingStore`.
//! - [`config`]: Canonical test configurations.

pub mod clock;
pub mod config;
pub mod feed;
pub mod store;
