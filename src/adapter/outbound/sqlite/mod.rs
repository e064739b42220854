//! SQLite persistence for seen records.
//!
//! Provides connection pooling, embedded migrations, and the Diesel-backed
//! [`store::SqliteSeenStore`].

pub mod connection;
pub mod model;
pub mod schema;
pub mod store;
