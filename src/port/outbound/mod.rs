//! Outbound ports implemented by adapters.

pub mod clock;
pub mod store;
pub mod surface;
