//! Time source for the wait loop.

use std::time::{Duration, Instant};

/// Where the wait loop reads time and sleeps.
///
/// Production code uses [`SystemClock`]; engine tests substitute a manual
/// clock so timeout behaviour is exact instead of wall-clock dependent.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);
}

/// Real time with blocking sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}
