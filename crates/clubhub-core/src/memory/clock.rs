//! Strictly increasing timestamps for creation stamps

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Wall clock that never hands out the same instant twice, so records
/// created back to back always sort in creation order.
pub(crate) struct MonotonicClock {
    last: Mutex<DateTime<Utc>>,
}

impl MonotonicClock {
    pub(crate) fn new() -> Self {
        Self {
            last: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Utc::now();
        let stamp = if now > *last {
            now
        } else {
            *last + Duration::microseconds(1)
        };
        *last = stamp;
        stamp
    }
}
