use std::time::{Duration, Instant};

/// Monotonic time source used to bracket timed calls.
///
/// `now` returns the time elapsed since an arbitrary fixed origin; only the
/// difference between two readings is meaningful.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

/// Production clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
