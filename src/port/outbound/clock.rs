//! Wall-clock port.

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
///
/// Expiry and throttling both read time through this port so tests can
/// drive them deterministically. No monotonicity is assumed.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
