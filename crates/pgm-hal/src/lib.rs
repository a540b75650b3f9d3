#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};

/// The Monotonic Clock.
/// INVARIANT: `now_us` never decreases.
pub trait PlatformClock: Send + Sync {
    /// Microseconds since an arbitrary fixed epoch.
    fn now_us(&self) -> u64;

    /// Park the calling flow of control for at least `us` microseconds.
    fn sleep_us(&self, us: u64);
}

/// Hand-driven clock for deterministic pacing.
/// Clones share the same counter, so a test can keep one handle
/// and give another to the code under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    t: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_us: u64) -> Self {
        Self { t: Arc::new(AtomicU64::new(start_us)) }
    }

    pub fn advance_us(&self, us: u64) {
        // Saturate instead of wrapping: time must not run backwards.
        // The closure always yields Some, so the update cannot be refused.
        self.t
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| Some(t.saturating_add(us)))
            .ok();
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms.saturating_mul(1_000));
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_us(secs.saturating_mul(1_000_000));
    }
}

impl PlatformClock for ManualClock {
    fn now_us(&self) -> u64 {
        self.t.load(Ordering::SeqCst)
    }

    /// Sleeping on a manual clock is instantaneous: it moves time forward.
    fn sleep_us(&self, us: u64) {
        self.advance_us(us);
    }
}
