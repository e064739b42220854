//! xdedupe - seen-item tracking for scrolling feeds.
//!
//! Watches items scroll out of a viewport, remembers them for a configurable
//! number of days, and folds them into compact placeholders when they show
//! up again. A user can expand any placeholder; that item is then exempt from
//! collapsing for the rest of the session.
//!
//! # Architecture
//!
//! - **`domain`** - Identities, geometry, seen records, signals and events
//! - **`port`** - Traits at the seams: render surface, store, clock, operator
//! - **`application`** - Seen cache, visibility scanner, throttle,
//!   placeholder state machine and the [`application::engine::Engine`]
//!   that ties them together
//! - **`adapter`** - Stores (memory, JSON file, SQLite), the simulated feed
//!   and the CLI
//! - **`infrastructure`** - Configuration, factories and operator wiring
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use xdedupe::adapter::outbound::feed::card::FeedCard;
//! use xdedupe::adapter::outbound::feed::surface::SimulatedFeed;
//! use xdedupe::adapter::outbound::memory::MemoryStore;
//! use xdedupe::application::engine::{Engine, EngineConfig};
//! use xdedupe::domain::signal::Signal;
//! use xdedupe::port::outbound::clock::SystemClock;
//!
//! let mut feed = SimulatedFeed::new(800.0);
//! feed.push(FeedCard::status("alice", "1", 300.0));
//!
//! let mut engine = Engine::new(
//!     EngineConfig::default(),
//!     Arc::new(MemoryStore::new()),
//!     feed,
//!     Arc::new(SystemClock),
//! );
//! engine.start();
//! engine.surface_mut().scroll_to(400.0);
//! let report = engine.handle(Signal::Scroll { position: 400.0 });
//! println!("{:?}", report.events);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
