//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! seen-tracking logic: configuration loading, store construction and the
//! operator implementations behind the CLI.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`factory`] - Component factory functions
//! - [`operator`] - CLI operator interface

pub mod config;
pub mod factory;
pub mod operator;
