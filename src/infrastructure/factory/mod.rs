//! Factory modules for building infrastructure components.
//!
//! Provides factory functions that construct fully-configured infrastructure
//! components from application configuration.
//!
//! # Submodules
//!
//! - [`store`] - Seen store construction

pub mod store;
