//! Rate and velocity gating of the scan/collapse pipeline.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::trace;

const fn default_interval_ms() -> u64 {
    80
}

const fn default_true() -> bool {
    true
}

fn default_velocity_scale() -> f64 {
    100.0
}

/// Throttle settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    /// Minimum time between processed ticks. Defaults to 80ms.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Suppress marking items as seen while the user flings the feed.
    ///
    /// Defaults to true.
    #[serde(default = "default_true")]
    pub velocity_gate: bool,

    /// Multiplier turning pixels per millisecond into the unit compared
    /// against the viewport height. Defaults to 100 (pixels per 100ms).
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f64,

    /// Minimum time between collapse passes; 0 runs one on every tick.
    #[serde(default)]
    pub collapse_cooldown_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            velocity_gate: true,
            velocity_scale: default_velocity_scale(),
            collapse_cooldown_ms: 0,
        }
    }
}

/// Decision for one incoming signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Too soon after the previous tick; the signal is discarded.
    Dropped,
    /// Run the pipeline.
    Accepted {
        /// Exited items may be recorded as seen.
        mark_seen: bool,
        /// The collapse pass may run.
        collapse: bool,
    },
}

#[derive(Debug, Clone)]
pub struct ScrollThrottle {
    config: ThrottleConfig,
    /// Time of the last accepted tick.
    last_tick: Option<DateTime<Utc>>,
    /// Time of the last collapse pass.
    last_collapse: Option<DateTime<Utc>>,
    /// Time and position of the last scroll signal, dropped ones included.
    last_scroll: Option<(DateTime<Utc>, f64)>,
}

impl ScrollThrottle {
    #[must_use]
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            last_tick: None,
            last_collapse: None,
            last_scroll: None,
        }
    }

    /// Forget all timing state.
    pub fn reset(&mut self) {
        self.last_tick = None;
        self.last_collapse = None;
        self.last_scroll = None;
    }

    /// Gate a signal arriving at `now`.
    ///
    /// `position` is the scroll offset for scroll signals and `None` for
    /// focus or timer ticks, which carry no velocity.
    pub fn admit(
        &mut self,
        now: DateTime<Utc>,
        position: Option<f64>,
        viewport_height: f64,
    ) -> Admission {
        let speed = position.map_or(0.0, |position| self.observe(now, position));

        if within(self.last_tick, now, self.config.interval_ms) {
            trace!(speed, "Tick dropped by rate gate");
            return Admission::Dropped;
        }
        self.last_tick = Some(now);

        let mark_seen = !(self.config.velocity_gate && speed > viewport_height);
        if !mark_seen {
            trace!(speed, viewport_height, "Seen marking suppressed by velocity gate");
        }

        let collapse = !within(self.last_collapse, now, self.config.collapse_cooldown_ms);
        if collapse {
            self.last_collapse = Some(now);
        }

        Admission::Accepted { mark_seen, collapse }
    }

    /// Record a scroll sample and return the scaled instantaneous speed.
    ///
    /// A non-positive time delta (same millisecond or a clock step
    /// backwards) yields zero speed.
    fn observe(&mut self, now: DateTime<Utc>, position: f64) -> f64 {
        let speed = match self.last_scroll {
            Some((at, previous)) => {
                let elapsed_ms = now.signed_duration_since(at).num_milliseconds();
                if elapsed_ms > 0 {
                    (position - previous).abs() / elapsed_ms as f64 * self.config.velocity_scale
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        self.last_scroll = Some((now, position));
        speed
    }
}

/// True when `last` is less than `window_ms` before `now`.
///
/// A clock step backwards never keeps a gate closed.
fn within(last: Option<DateTime<Utc>>, now: DateTime<Utc>, window_ms: u64) -> bool {
    let Some(last) = last else {
        return false;
    };
    let elapsed = now.signed_duration_since(last);
    let window = Duration::milliseconds(i64::try_from(window_ms).unwrap_or(i64::MAX));
    elapsed >= Duration::zero() && elapsed < window
}
