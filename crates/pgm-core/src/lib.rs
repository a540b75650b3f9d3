#![no_std]
#[cfg(feature = "std")]
extern crate std;

/// Default maximum transmission protocol data unit (Ethernet MTU).
pub const DEFAULT_MAX_TPDU: usize = 1500;

pub const IPV4_HEADER_LEN: usize = 20;
pub const IPV6_HEADER_LEN: usize = 40;

/// Network layer the flow is carried over.
/// Determines the per-packet header cost charged against the rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    #[default]
    V4,
    V6,
}

impl AddressFamily {
    pub const fn header_len(self) -> usize {
        match self {
            AddressFamily::V4 => IPV4_HEADER_LEN,
            AddressFamily::V6 => IPV6_HEADER_LEN,
        }
    }
}

pub type PgmResult<T> = Result<T, PgmError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgmError {
    /// TPDU size of zero.
    InvalidTpdu,
    /// Header alone fills the TPDU, leaving no room for payload.
    HeaderTooLarge,
    /// Rate cannot carry a single TPDU per second.
    RateBelowTpdu,
    /// Payload plus header exceeds the TPDU.
    PayloadTooLarge,
}

impl core::fmt::Display for PgmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PgmError::InvalidTpdu => write!(f, "max TPDU must be non-zero"),
            PgmError::HeaderTooLarge => write!(f, "header length must be smaller than max TPDU"),
            PgmError::RateBelowTpdu => write!(f, "rate must be zero (unregulated) or at least one TPDU per second"),
            PgmError::PayloadTooLarge => write!(f, "payload plus header exceeds max TPDU"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PgmError {}
