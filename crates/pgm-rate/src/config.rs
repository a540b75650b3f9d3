#![forbid(unsafe_code)]

use pgm_core::{AddressFamily, PgmError, PgmResult, DEFAULT_MAX_TPDU};

/// Creation parameters for a [`RateBucket`](crate::RateBucket).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateConfig {
    /// Byte rate ceiling. Zero disables regulation.
    pub rate_per_sec: u64,
    /// Header bytes charged on top of every payload.
    pub header_len: usize,
    pub max_tpdu: usize,
}

impl RateConfig {
    pub fn new(rate_per_sec: u64, family: AddressFamily) -> Self {
        Self {
            rate_per_sec,
            header_len: family.header_len(),
            max_tpdu: DEFAULT_MAX_TPDU,
        }
    }

    /// Recoverable check for parameters coming from outside the process.
    /// `RateBucket::new` asserts instead.
    pub fn validate(&self) -> PgmResult<()> {
        if self.max_tpdu == 0 {
            return Err(PgmError::InvalidTpdu);
        }
        if self.header_len >= self.max_tpdu {
            return Err(PgmError::HeaderTooLarge);
        }
        if self.rate_per_sec != 0 && self.rate_per_sec < self.max_tpdu as u64 {
            return Err(PgmError::RateBelowTpdu);
        }
        Ok(())
    }

    /// Largest payload that fits in one TPDU after the header.
    pub fn max_payload(&self) -> usize {
        self.max_tpdu.saturating_sub(self.header_len)
    }

    pub fn check_payload(&self, payload_size: usize) -> PgmResult<()> {
        if payload_size > self.max_payload() {
            return Err(PgmError::PayloadTooLarge);
        }
        Ok(())
    }
}
