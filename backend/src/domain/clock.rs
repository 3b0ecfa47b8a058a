//! Time source for `lastStampedAt` and `achievedAt`.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::sync::Mutex;

/// Current-time capability injected into services
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as ISO-8601 with milliseconds, e.g. `2024-01-01T00:00:00.000Z`
    fn now_iso8601(&self) -> String {
        to_iso8601(self.now())
    }

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

pub fn to_iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to; for tests
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut current) = self.instant.lock() {
            *current += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
            .lock()
            .map(|instant| *instant)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}
