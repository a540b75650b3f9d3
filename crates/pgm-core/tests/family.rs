use pgm_core::{AddressFamily, PgmError, IPV4_HEADER_LEN, IPV6_HEADER_LEN};

#[test]
fn test_header_len_per_family() {
    assert_eq!(AddressFamily::V4.header_len(), IPV4_HEADER_LEN);
    assert_eq!(AddressFamily::V6.header_len(), IPV6_HEADER_LEN);
    assert_eq!(AddressFamily::default(), AddressFamily::V4);
}

#[test]
fn test_error_is_std_error() {
    fn takes_error(_: &dyn std::error::Error) {}
    takes_error(&PgmError::InvalidTpdu);

    // Display carries a human readable reason, not the variant name
    let msg = PgmError::RateBelowTpdu.to_string();
    assert!(msg.contains("TPDU"), "{}", msg);
}
