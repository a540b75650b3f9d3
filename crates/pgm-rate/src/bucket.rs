#![forbid(unsafe_code)]

use alloc::boxed::Box;
use core::fmt;

use log::{debug, trace};
use pgm_hal::PlatformClock;

use crate::config::RateConfig;
use crate::resolution::Resolution;

/// The Token Bucket Rate Regulator.
///
/// One bucket per outbound flow. The transport calls [`check`](Self::check)
/// before every transmit; the bucket holds at most one resolution unit of
/// traffic, so the burst after an idle period is bounded.
///
/// Not internally synchronised: `check` takes `&mut self`. Flows sharing a
/// bucket across threads wrap it in their own mutex.
pub struct RateBucket {
    clock: Box<dyn PlatformClock>,
    rate_per_sec: u64,
    header_len: usize,
    resolution: Resolution,
    /// Bytes per resolution unit. Also the capacity.
    per_unit: u64,
    level: u64, // Bytes allowed to send
    last_refill_us: u64,
}

impl RateBucket {
    /// # Panics
    /// If `max_tpdu` is zero. That is a caller defect, not a runtime condition.
    pub fn new(
        clock: Box<dyn PlatformClock>,
        rate_per_sec: u64,
        header_len: usize,
        max_tpdu: usize,
    ) -> Self {
        assert!(max_tpdu > 0, "rate bucket requires a non-zero max TPDU");

        let resolution = Resolution::select(rate_per_sec, max_tpdu);
        let per_unit = resolution.per_unit(rate_per_sec);
        let last_refill_us = clock.now_us();

        debug!(
            "rate bucket: {} B/s, {:?} resolution, capacity {} B, header {} B",
            rate_per_sec, resolution, per_unit, header_len
        );

        Self {
            clock,
            rate_per_sec,
            header_len,
            resolution,
            per_unit,
            level: 0,
            last_refill_us,
        }
    }

    pub fn from_config(clock: Box<dyn PlatformClock>, config: &RateConfig) -> Self {
        Self::new(clock, config.rate_per_sec, config.header_len, config.max_tpdu)
    }

    /// Tear down the bucket at the end of the flow.
    pub fn destroy(self) {
        debug!("rate bucket destroyed: {} B/s, level {} B", self.rate_per_sec, self.level);
    }

    /// Admission decision for a packet of `payload_size` bytes (header excluded).
    ///
    /// Non-blocking: returns `false` without touching any state when the
    /// bucket is short. Blocking: parks on the clock until the bucket has
    /// accrued enough and always returns `true`.
    pub fn check(&mut self, payload_size: usize, blocking: bool) -> bool {
        if self.is_unregulated() {
            return true;
        }

        let cost = self.cost(payload_size);
        // A packet larger than the bucket can only go out on a full bucket.
        let needed = if blocking { cost.min(self.per_unit) } else { cost };

        loop {
            let now = self.clock.now_us();
            let elapsed = now.saturating_sub(self.last_refill_us);
            let accrued = self.resolution.accrue(self.per_unit, elapsed);
            let refilled = self.level.saturating_add(accrued).min(self.per_unit);

            if refilled >= needed {
                // Sub-token gaps keep their timestamp so the fraction is not lost.
                if accrued > 0 {
                    self.last_refill_us = now;
                }
                self.level = refilled.saturating_sub(cost);
                if cost > refilled {
                    self.settle_excess(cost - refilled);
                }
                return true;
            }

            if !blocking {
                return false;
            }

            let wait = self.wait_us(elapsed, needed);
            trace!("rate bucket short {} of {} B, parking {} us", needed - refilled, needed, wait);
            self.clock.sleep_us(wait.max(1));
        }
    }

    /// An oversize packet left on a full bucket. Park for the time the
    /// bytes beyond capacity take to accrue, and restart refills from the
    /// wake-up so they are paid for.
    fn settle_excess(&mut self, excess: u64) {
        let wait = self.resolution.time_to_accrue(self.per_unit, excess);
        trace!("rate bucket oversize by {} B, parking {} us", excess, wait);
        self.clock.sleep_us(wait);
        self.last_refill_us = self.clock.now_us();
    }

    /// Microseconds until `check(payload_size, _)` would be admitted.
    /// Zero when it would be admitted now. Packets larger than the bucket
    /// report the time until the bucket is full.
    pub fn remaining(&self, payload_size: usize) -> u64 {
        if self.is_unregulated() {
            return 0;
        }
        let needed = self.cost(payload_size).min(self.per_unit);
        let elapsed = self.clock.now_us().saturating_sub(self.last_refill_us);
        self.wait_us(elapsed, needed)
    }

    /// Time left to accrue `needed` bytes on top of the committed level,
    /// given `elapsed` already counted since the last refill.
    fn wait_us(&self, elapsed: u64, needed: u64) -> u64 {
        let missing = needed.saturating_sub(self.level);
        self.resolution
            .time_to_accrue(self.per_unit, missing)
            .saturating_sub(elapsed)
    }

    /// Bytes debited for a payload: the payload plus the per-packet header.
    pub fn cost(&self, payload_size: usize) -> u64 {
        (payload_size as u64).saturating_add(self.header_len as u64)
    }

    pub fn is_unregulated(&self) -> bool {
        self.rate_per_sec == 0
    }

    pub fn capacity(&self) -> u64 {
        self.per_unit
    }

    /// Bytes available as of the last committed refill.
    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn rate_per_sec(&self) -> u64 {
        self.rate_per_sec
    }

    pub fn header_len(&self) -> usize {
        self.header_len
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn last_refill_us(&self) -> u64 {
        self.last_refill_us
    }
}

impl fmt::Debug for RateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateBucket")
            .field("rate_per_sec", &self.rate_per_sec)
            .field("header_len", &self.header_len)
            .field("resolution", &self.resolution)
            .field("capacity", &self.per_unit)
            .field("level", &self.level)
            .field("last_refill_us", &self.last_refill_us)
            .finish()
    }
}
