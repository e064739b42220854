//! Outbound adapters: seen stores and the simulated render surface.

pub mod blob;
pub mod feed;
pub mod memory;
pub mod sqlite;
pub mod writer;
