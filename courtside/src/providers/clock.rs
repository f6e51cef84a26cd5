//! Clock trait.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Injected everywhere a timestamp or expiry check happens, so tests can
/// pin the clock and exercise expiries deterministically.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// System clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
