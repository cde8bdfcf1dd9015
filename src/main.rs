//! # QuickGPS
//!
//! Reads NMEA sentences from a serial GPS receiver and logs every fix
//! change as JSON.
//!
//! Usage: `quick-gps [config.toml]`

use anyhow::{Context, Result};
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use quick_gps::clock::MonotonicClock;
use quick_gps::config::{Config, LoggingConfig};
use quick_gps::nmea::protocol::Fix;
use quick_gps::receiver::{GpsReceiver, ReceiverSettings};
use quick_gps::serial::GpsSerial;

/// Period between status log messages
const STATUS_INTERVAL_MS: u64 = 10_000;

/// File name prefix of the rolling log
const LOG_FILE_PREFIX: &str = "quick-gps.log";

/// Main entry point for QuickGPS
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first argument, or defaults)
///    - Set up logging
///    - Open the serial port and send the receiver configuration
///
/// 2. **Main Loop**
///    - Call `update()` every `poll_interval_ms`
///    - Log the fix as JSON whenever it changes
///    - Log receiver counters every 10 seconds
///    - Handle Ctrl+C for graceful shutdown
///
/// # Errors
///
/// Returns error if:
/// - The configuration file cannot be loaded
/// - No GPS device can be opened
/// - The initial configuration cannot be written
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO quick_gps: QuickGPS v0.1.0 starting...
/// INFO quick_gps::serial: Successfully opened GPS device at /dev/ttyACM0 (9600 baud)
/// INFO quick_gps::receiver: GPS port configured at 9600 baud
/// INFO quick_gps: Fix {"time_ms":1039422959000,"longitude":8.565254,...}
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::default(),
    };

    let _log_guard = init_logging(&config.logging);

    info!("QuickGPS v{} starting...", env!("CARGO_PKG_VERSION"));
    debug!("Configuration: {:?}", config);

    let serial = GpsSerial::open(&config.serial)?;
    info!("GPS serial port opened at: {}", serial.device_path());

    let mut gps = GpsReceiver::new(
        serial.into_port(),
        MonotonicClock::new(),
        ReceiverSettings::from(&config),
    );
    gps.begin().context("Failed to configure GPS receiver")?;

    let poll_interval_ms = config.receiver.poll_interval_ms;
    let status_ticks = status_interval_ticks(poll_interval_ms);
    let mut poll_interval = interval(Duration::from_millis(poll_interval_ms));

    info!("Polling receiver every {}ms", poll_interval_ms);
    info!("Press Ctrl+C to exit");

    let mut last_fix = gps.read_position();
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                ticks += 1;

                match gps.update() {
                    Ok(true) => {
                        let fix = gps.read_position();
                        if fix != last_fix {
                            log_fix(&fix);
                            last_fix = fix;
                        }
                    }
                    Ok(false) => {}
                    Err(e) => warn!("Failed to read from GPS: {}", e),
                }

                if ticks % status_ticks == 0 {
                    let stats = gps.stats();
                    info!(
                        "Status: lock={} sentences={} fixes={} checksum_errors={} overflows={} pokes={}",
                        last_fix.lock,
                        stats.sentences,
                        stats.fixes,
                        stats.checksum_errors,
                        stats.overflows,
                        stats.pokes,
                    );
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!("QuickGPS stopped after {} polls", ticks);
    Ok(())
}

/// Install the stdout subscriber, plus a daily rolling file when `log_dir` is set
///
/// `RUST_LOG` overrides the configured level. The returned guard flushes the
/// file writer on drop.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = if config.log_dir.is_empty() {
        (None, None)
    } else {
        let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

fn log_fix(fix: &Fix) {
    match serde_json::to_string(fix) {
        Ok(json) => match fix_timestamp(fix) {
            Some(time) => info!("Fix {} ({})", json, time),
            None => info!("Fix {}", json),
        },
        Err(e) => warn!("Failed to serialize fix: {}", e),
    }
}

/// RFC 3339 rendering of the fix time, if one has been decoded
fn fix_timestamp(fix: &Fix) -> Option<String> {
    fix.time_ms
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|time| time.to_rfc3339())
}

/// Number of poll ticks between status messages
fn status_interval_ticks(poll_interval_ms: u64) -> u64 {
    (STATUS_INTERVAL_MS / poll_interval_ms.max(1)).max(1)
}
