//! Clock abstraction so cache aging can be driven by a fake time in tests.

use chrono::{DateTime, Utc};

/// Source of "now" for cache entry creation and age checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
