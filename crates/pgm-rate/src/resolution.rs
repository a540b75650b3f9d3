#![forbid(unsafe_code)]

const USECS_PER_SEC: u64 = 1_000_000;
const USECS_PER_MSEC: u64 = 1_000;

/// Millisecond refills kick in once one millisecond of traffic reaches
/// this many TPDUs. Below that a one-second bucket is small enough.
pub const MILLISECOND_TPDU_MULTIPLE: u64 = 1;

/// Refill granularity of a bucket. Picked once, at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Bucket holds one second of traffic.
    Second,
    /// Bucket holds one millisecond of traffic. Bounds bursts on fast links.
    Millisecond,
}

impl Resolution {
    pub fn select(rate_per_sec: u64, max_tpdu: usize) -> Self {
        let per_msec = rate_per_sec / 1_000;
        let threshold = (max_tpdu as u64).saturating_mul(MILLISECOND_TPDU_MULTIPLE);
        if per_msec > 0 && per_msec >= threshold {
            Resolution::Millisecond
        } else {
            Resolution::Second
        }
    }

    /// Length of one refill unit.
    pub const fn unit_us(self) -> u64 {
        match self {
            Resolution::Second => USECS_PER_SEC,
            Resolution::Millisecond => USECS_PER_MSEC,
        }
    }

    /// Bytes permitted per unit at `rate_per_sec`. This is the bucket capacity.
    pub const fn per_unit(self, rate_per_sec: u64) -> u64 {
        match self {
            Resolution::Second => rate_per_sec,
            Resolution::Millisecond => rate_per_sec / 1_000,
        }
    }

    /// Tokens accrued over `elapsed_us`, never more than one unit's worth.
    pub fn accrue(self, per_unit: u64, elapsed_us: u64) -> u64 {
        let unit = self.unit_us();
        // Clamp before multiplying: arbitrarily long gaps must not overflow.
        if elapsed_us >= unit {
            return per_unit;
        }
        ((per_unit as u128 * elapsed_us as u128) / unit as u128) as u64
    }

    /// Time for `tokens` bytes to trickle in at `per_unit` bytes per unit.
    /// Up to one unit's worth this is the smallest elapsed time after which
    /// `accrue` yields at least `tokens`.
    pub fn time_to_accrue(self, per_unit: u64, tokens: u64) -> u64 {
        if tokens == 0 {
            return 0;
        }
        if per_unit == 0 {
            return self.unit_us();
        }
        let scaled = tokens as u128 * self.unit_us() as u128;
        let per_unit = per_unit as u128;
        u64::try_from((scaled + per_unit - 1) / per_unit).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_boundary() {
        // 1,500 bytes per millisecond is exactly one TPDU
        assert_eq!(Resolution::select(1_500_000, 1500), Resolution::Millisecond);
        assert_eq!(Resolution::select(1_499_999, 1500), Resolution::Second);
        assert_eq!(Resolution::select(0, 1500), Resolution::Second);
    }

    #[test]
    fn test_partial_unit() {
        // half a millisecond at 2020 bytes/ms
        assert_eq!(Resolution::Millisecond.accrue(2020, 500), 1010);
        assert_eq!(Resolution::Millisecond.accrue(2020, 0), 0);
        assert_eq!(Resolution::Second.accrue(2020, u64::MAX), 2020);
    }

    #[test]
    fn test_time_to_accrue_inverts_accrue() {
        for tokens in [1u64, 7, 202, 1010, 2019] {
            let t = Resolution::Millisecond.time_to_accrue(2020, tokens);
            assert!(Resolution::Millisecond.accrue(2020, t) >= tokens);
            assert!(Resolution::Millisecond.accrue(2020, t - 1) < tokens);
        }
        // Beyond one unit: 5000 bytes at 1800 B/s
        assert_eq!(Resolution::Second.time_to_accrue(1800, 5000), 2_777_778);
        assert_eq!(Resolution::Second.time_to_accrue(1800, 1800), 1_000_000);
        assert_eq!(Resolution::Second.time_to_accrue(1800, 0), 0);
    }
}
