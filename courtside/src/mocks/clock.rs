//! Fixed clock for testing.

use crate::providers::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Clock pinned to a settable instant.
///
/// Defaults to 2025-01-01T00:00:00Z and only moves via [`FixedClock::set`]
/// or [`FixedClock::advance`], so expiry behavior is fully deterministic.
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    /// Create a clock pinned to `instant`.
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(Mutex::new(instant)),
        }
    }

    /// Move the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        match self.instant.lock() {
            Ok(mut guard) => *guard = instant,
            Err(mut poisoned) => **poisoned.get_mut() = instant,
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        match self.instant.lock() {
            Ok(mut guard) => *guard += delta,
            Err(mut poisoned) => **poisoned.get_mut() += delta,
        }
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        // 2025-01-01T00:00:00Z
        Self::at(DateTime::from_timestamp(1_735_689_600, 0).unwrap_or(DateTime::UNIX_EPOCH))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.instant.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
