use std::time::{Duration, Instant};

use pgm_hal::PlatformClock;

/// Whole microseconds in `d`, pinned at `u64::MAX` rather than wrapping.
pub fn duration_to_us(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

/// Monotonic OS clock. Epoch is the moment of construction;
/// clones share that epoch.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock(Instant);

impl SystemClock {
    pub fn new() -> Self {
        Self(Instant::now())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformClock for SystemClock {
    fn now_us(&self) -> u64 {
        duration_to_us(self.0.elapsed())
    }

    fn sleep_us(&self, us: u64) {
        std::thread::sleep(Duration::from_micros(us));
    }
}
