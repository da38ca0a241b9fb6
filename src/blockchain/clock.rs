use chrono::Utc;

/// Source of header timestamps, in seconds since the Unix epoch.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Live wall-clock time with microsecond resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Always returns the same instant. Makes mining reproducible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now(&self) -> f64 {
        self.0
    }
}
