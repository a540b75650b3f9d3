use pgm_hal::PlatformClock;
use pgm_sys::{duration_to_us, SystemClock};
use std::time::Duration;

#[test]
fn test_monotonic() {
    let clock = SystemClock::new();
    let mut last = clock.now_us();
    for _ in 0..1000 {
        let now = clock.now_us();
        assert!(now >= last);
        last = now;
    }
}

#[test]
fn test_sleep_parks_at_least_requested() {
    let clock = SystemClock::new();
    let before = clock.now_us();
    clock.sleep_us(2_000);
    assert!(clock.now_us() - before >= 2_000);
}

#[test]
fn test_clones_share_epoch() {
    let clock = SystemClock::new();
    clock.sleep_us(1_000);
    let copy = clock;
    assert!(copy.now_us() >= 1_000);
}

#[test]
fn test_duration_saturates() {
    assert_eq!(duration_to_us(Duration::from_millis(3)), 3_000);
    assert_eq!(duration_to_us(Duration::from_micros(u64::MAX)), u64::MAX);
    // Duration::MAX is ~1.8e25 us, far past u64
    assert_eq!(duration_to_us(Duration::MAX), u64::MAX);
}
