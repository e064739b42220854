//! Simulated feed render surface.

pub mod card;
pub mod identity;
pub mod surface;
