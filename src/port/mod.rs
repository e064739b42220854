//! Hexagonal ports: traits the application exposes and consumes.

pub mod inbound;
pub mod outbound;
