//! Deterministic clock for aging tests.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use nwp_common::Clock;

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::time::demo_init_time;

    #[test]
    fn test_advance_and_set() {
        let clock = ManualClock::new(demo_init_time());
        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), demo_init_time() + Duration::hours(2));
        clock.set(demo_init_time());
        assert_eq!(clock.now(), demo_init_time());
    }
}
