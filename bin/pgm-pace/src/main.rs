use clap::Parser;
use pgm_core::{AddressFamily, DEFAULT_MAX_TPDU};
use pgm_hal::{ManualClock, PlatformClock};
use pgm_rate::{RateBucket, RateConfig};
use pgm_sys::SystemClock;
use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use log::{info, warn};

/// Paces synthetic ODATA through a rate bucket and reports the achieved rate.
#[derive(Parser)]
struct Cli {
    /// Regulate to rate bytes per second (0 = unregulated)
    #[arg(long, default_value_t = 400_000)] rate: u64,
    #[arg(long, default_value_t = DEFAULT_MAX_TPDU)] tpdu: usize,
    #[arg(long, default_value_t = 1000)] payload: usize,
    #[arg(long)] ipv6: bool,
    /// Park inside check() instead of polling remaining()
    #[arg(long)] blocking: bool,
    #[arg(long, default_value_t = 1000)] duration_ms: u64,
    /// Drive a manual clock: runs instantly, deterministic output
    #[arg(long)] simulate: bool,
}

#[derive(Debug, Default)]
struct Report {
    admitted: u64,
    deferred: u64,
    bytes: u64,
    elapsed_us: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let family = if cli.ipv6 { AddressFamily::V6 } else { AddressFamily::V4 };
    let config = RateConfig { max_tpdu: cli.tpdu, ..RateConfig::new(cli.rate, family) };
    config.validate()?;
    config.check_payload(cli.payload)?;

    info!(
        "pacing {} B payloads (+{} B header) at {} B/s for {} ms{}",
        cli.payload, config.header_len, cli.rate, cli.duration_ms,
        if cli.simulate { " [simulated]" } else { "" }
    );

    let running = Arc::new(AtomicBool::new(true));
    let report = if cli.simulate {
        run(ManualClock::new(1), &cli, &config, &running)
    } else {
        let r = running.clone();
        ctrlc::set_handler(move || {
            warn!("Signal received. Stopping...");
            r.store(false, Ordering::SeqCst);
        })?;
        run(SystemClock::new(), &cli, &config, &running)
    };

    let achieved = if report.elapsed_us > 0 {
        (report.bytes as u128 * 1_000_000 / report.elapsed_us as u128) as u64
    } else {
        0
    };
    info!(
        "admitted {} packets ({} B), deferred {}, elapsed {} us, achieved {} B/s",
        report.admitted, report.bytes, report.deferred, report.elapsed_us, achieved
    );
    Ok(())
}

/// The transport's send loop, minus the socket.
fn run<C>(clock: C, cli: &Cli, config: &RateConfig, running: &AtomicBool) -> Report
where
    C: PlatformClock + Clone + 'static,
{
    let mut bucket = RateBucket::from_config(Box::new(clock.clone()), config);
    let start = clock.now_us();
    let deadline = start.saturating_add(cli.duration_ms.saturating_mul(1_000));
    let cost = bucket.cost(cli.payload);
    let mut report = Report::default();

    // An unregulated bucket never pushes back; bound the loop by packet count too.
    let max_packets = if bucket.is_unregulated() { 1_000_000 } else { u64::MAX };

    while running.load(Ordering::SeqCst) && clock.now_us() < deadline && report.admitted < max_packets {
        if bucket.check(cli.payload, cli.blocking) {
            report.admitted += 1;
            report.bytes += cost;
        } else {
            report.deferred += 1;
            // Poll with a timeout, as a non-blocking sender would
            clock.sleep_us(bucket.remaining(cli.payload).max(1));
        }
    }

    report.elapsed_us = clock.now_us().saturating_sub(start);
    bucket.destroy();
    report
}
