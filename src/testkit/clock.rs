//! Deterministic clock for driving expiry and throttling in tests.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::port::outbound::clock::Clock;

/// Epoch seconds of the default starting instant (2023-11-14T22:13:20Z).
pub const T0_SECS: i64 = 1_700_000_000;

/// The default starting instant.
#[must_use]
pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(T0_SECS, 0).unwrap_or_default()
}

/// Clock that only moves when a test advances or sets it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(at) }
    }

    /// Move forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(t0())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
