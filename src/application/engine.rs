//! Engine lifecycle and signal dispatch.
//!
//! One engine owns every piece of per-session state: the seen cache with its
//! undo set, the prior candidate snapshot, the throttle and the placeholder
//! machine. Several engines may run side by side in one process.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use super::cache::seen::{SeenCache, SeenCacheConfig};
use super::placeholder::{PlaceholderConfig, PlaceholderMachine};
use super::scanner::{ScannerConfig, VisibilityScanner};
use super::throttle::{Admission, ScrollThrottle, ThrottleConfig};
use crate::domain::placeholder::ItemState;
use crate::domain::signal::{EngineEvent, Signal};
use crate::port::outbound::clock::Clock;
use crate::port::outbound::store::SeenStore;
use crate::port::outbound::surface::ItemPresenter;

/// Settings for every engine component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub cache: SeenCacheConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub placeholder: PlaceholderConfig,
}

/// How a signal was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The signal ran to completion.
    Processed,
    /// The rate gate discarded the signal.
    Dropped,
    /// The engine is not running; nothing happened.
    Stopped,
}

/// Result of [`Engine::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub events: Vec<EngineEvent>,
}

impl TickReport {
    fn empty(outcome: TickOutcome) -> Self {
        Self {
            outcome,
            events: Vec::new(),
        }
    }

    /// True when the throttle discarded the signal.
    #[must_use]
    pub fn dropped(&self) -> bool {
        self.outcome == TickOutcome::Dropped
    }
}

pub struct Engine<P: ItemPresenter> {
    cache: SeenCache,
    scanner: VisibilityScanner,
    throttle: ScrollThrottle,
    machine: PlaceholderMachine<P::Handle>,
    /// Candidates from the previous accepted tick.
    snapshot: Vec<P::Handle>,
    surface: P,
    clock: Arc<dyn Clock>,
    running: bool,
}

impl<P: ItemPresenter> Engine<P> {
    #[must_use]
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn SeenStore>,
        surface: P,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache: SeenCache::new(store, &config.cache),
            scanner: VisibilityScanner::new(config.scanner),
            throttle: ScrollThrottle::new(config.throttle),
            machine: PlaceholderMachine::new(config.placeholder),
            snapshot: Vec::new(),
            surface,
            clock,
            running: false,
        }
    }

    /// Begin tracking. Returns false when already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        let summary = self.cache.load(self.clock.now());
        self.throttle.reset();
        self.snapshot.clear();
        self.running = true;
        info!(cached = summary.kept, "Engine started");
        true
    }

    /// Stop tracking and flush pending records. Returns false when already
    /// stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let flushed = self.cache.flush();
        self.snapshot.clear();
        self.running = false;
        info!(flushed, "Engine stopped");
        true
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Process one signal from the hosting context.
    pub fn handle(&mut self, signal: Signal) -> TickReport {
        if !self.running {
            debug!(?signal, "Ignoring signal while stopped");
            return TickReport::empty(TickOutcome::Stopped);
        }
        let now = self.clock.now();

        match signal {
            Signal::Scroll { position } => self.tick(now, Some(position)),
            Signal::Interval => self.tick(now, None),
            Signal::Focus => {
                self.cache.load(now);
                self.tick(now, None)
            }
            Signal::Blur | Signal::Hide => {
                self.cache.flush();
                TickReport::empty(TickOutcome::Processed)
            }
            Signal::Restore(id) => {
                let mut report = TickReport::empty(TickOutcome::Processed);
                self.cache.restore(id.clone());
                if self.machine.restore(&mut self.surface, &id) {
                    report.events.push(EngineEvent::Restored(id));
                }
                report
            }
        }
    }

    /// Collapse pass, then exit detection against the prior snapshot, then
    /// a fresh snapshot. Collapsing shifts layout, so candidates are listed
    /// after it.
    fn tick(&mut self, now: DateTime<Utc>, position: Option<f64>) -> TickReport {
        let viewport_height = self.surface.viewport().height;
        let Admission::Accepted { mark_seen, collapse } =
            self.throttle.admit(now, position, viewport_height)
        else {
            return TickReport::empty(TickOutcome::Dropped);
        };

        let mut report = TickReport::empty(TickOutcome::Processed);

        if collapse {
            let candidates = self.scanner.list_candidates(&self.surface);
            let collapsed =
                self.machine
                    .collapse_pass(&mut self.surface, &candidates, &self.cache, now);
            report
                .events
                .extend(collapsed.into_iter().map(EngineEvent::Collapsed));
        }

        if mark_seen {
            let ttl = self.cache.ttl();
            for handle in self.scanner.detect_exited(&self.surface, &self.snapshot) {
                let Some(id) = self.surface.resolve_identity(&handle) else {
                    continue;
                };
                if self.cache.mark_seen(Some(id.clone()), ttl, now) {
                    report.events.push(EngineEvent::Seen(id));
                }
            }
        }

        self.snapshot = self.scanner.list_candidates(&self.surface);
        report
    }

    /// Collapse state of `handle`.
    #[must_use]
    pub fn state(&self, handle: &P::Handle) -> ItemState {
        self.machine.state(handle)
    }

    #[must_use]
    pub fn cache(&self) -> &SeenCache {
        &self.cache
    }

    #[must_use]
    pub fn surface(&self) -> &P {
        &self.surface
    }

    /// Mutable access for the host to scroll or re-render between signals.
    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    /// Candidates captured by the last accepted tick.
    #[must_use]
    pub fn snapshot(&self) -> &[P::Handle] {
        &self.snapshot
    }
}
