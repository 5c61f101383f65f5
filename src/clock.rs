use chrono::{DateTime, Utc};
use fintrack_core::Clock;

/// Wall-clock time. The only place the application reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
