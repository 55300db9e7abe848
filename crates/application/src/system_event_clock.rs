use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::EventClock;

/// Wall clock truncated to microseconds that never hands out an instant
/// earlier than one it already issued.
#[derive(Debug)]
pub struct SystemEventClock {
    last_issued_micros: AtomicI64,
}

impl SystemEventClock {
    /// Creates a clock with no issued instants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_issued_micros: AtomicI64::new(i64::MIN),
        }
    }

    fn issue(&self, observed: DateTime<Utc>) -> DateTime<Utc> {
        let observed_micros = observed.timestamp_micros();
        let previous = self
            .last_issued_micros
            .fetch_max(observed_micros, Ordering::SeqCst);

        DateTime::from_timestamp_micros(previous.max(observed_micros)).unwrap_or(observed)
    }
}

impl Default for SystemEventClock {
    fn default() -> Self {
        Self::new()
    }
}

impl EventClock for SystemEventClock {
    fn now(&self) -> DateTime<Utc> {
        self.issue(Utc::now())
    }
}
