use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

/// Source of "now" for publish-state evaluation and bookkeeping timestamps.
///
/// The clock is injected rather than read ambiently so every time-dependent
/// code path (publish classification, list filtering, `updated_at` bumps)
/// stays deterministic under test.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation for production use.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests. Clones share the same instant, so a test can
/// keep one handle and advance time observed by the service.
#[derive(Clone, Debug)]
pub struct FixedClock {
    instant: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(RwLock::new(instant)),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.write().expect("lock poisoned") = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.read().expect("lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_returns_set_instant() {
        let t0 = Utc.timestamp_opt(1_000, 0).unwrap();
        let t1 = Utc.timestamp_opt(2_000, 0).unwrap();
        let clock = FixedClock::new(t0);
        assert_eq!(clock.now(), t0);

        clock.set(t1);
        assert_eq!(clock.now(), t1);
    }

    #[test]
    fn fixed_clock_clones_share_time() {
        let t0 = Utc.timestamp_opt(1_000, 0).unwrap();
        let clock = FixedClock::new(t0);
        let observer = clock.clone();

        clock.set(Utc.timestamp_opt(9_000, 0).unwrap());
        assert_eq!(observer.now(), Utc.timestamp_opt(9_000, 0).unwrap());
    }

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
