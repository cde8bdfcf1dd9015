//! # GPS Receiver Module
//!
//! Drives a [`GpsPort`]: reassembles lines from the byte stream, decodes
//! them into the current [`Fix`], and keeps the receiver configured.
//!
//! ## Read loop
//!
//! [`GpsReceiver::update`] is meant to be called once per control-loop tick.
//! It reads while bytes are available, but gives up once the configured
//! time budget is spent so a burst of buffered input cannot starve the
//! caller. Anything left in the port is picked up on the next call.
//!
//! ## Usage
//!
//! ```no_run
//! use quick_gps::clock::MonotonicClock;
//! use quick_gps::config::Config;
//! use quick_gps::receiver::{GpsReceiver, ReceiverSettings};
//! use quick_gps::serial::GpsSerial;
//!
//! let config = Config::default();
//! let port = GpsSerial::open(&config.serial)?.into_port();
//! let mut gps = GpsReceiver::new(port, MonotonicClock::new(), ReceiverSettings::from(&config));
//! gps.begin()?;
//!
//! loop {
//!     if gps.update()? {
//!         let fix = gps.read_position();
//!         if fix.lock {
//!             println!("{} {}", fix.latitude, fix.longitude);
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod line_buffer;
pub mod watchdog;

use tracing::{debug, info, trace};

use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::nmea::decoder::{decode_sentence, DecodeOutcome};
use crate::nmea::encoder::configuration_sequence;
use crate::nmea::protocol::Fix;
use crate::serial::{GpsPort, GPS_DEFAULT_BAUD_RATE};
use line_buffer::{LineBuffer, Push};
use watchdog::{LockWatchdog, WatchdogAction};

/// Default read budget per `update()` call, in milliseconds
pub const DEFAULT_READ_BUDGET_MS: u64 = 2;

/// Tunables of a [`GpsReceiver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverSettings {
    /// Line speed, also announced to the receiver in `$PUBX,41`
    pub baud_rate: u32,
    /// Longest time one `update()` call may spend reading
    pub read_budget_ms: u64,
    /// Consecutive fixless sentences tolerated before a poke
    pub lock_loss_threshold: u32,
}

impl Default for ReceiverSettings {
    fn default() -> Self {
        Self {
            baud_rate: GPS_DEFAULT_BAUD_RATE,
            read_budget_ms: DEFAULT_READ_BUDGET_MS,
            lock_loss_threshold: LockWatchdog::DEFAULT_THRESHOLD,
        }
    }
}

impl From<&Config> for ReceiverSettings {
    fn from(config: &Config) -> Self {
        Self {
            baud_rate: config.serial.baud_rate,
            read_budget_ms: config.receiver.read_budget_ms,
            lock_loss_threshold: config.receiver.lock_loss_threshold,
        }
    }
}

/// Running counters, for status logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Lines that completed with a terminator
    pub lines: u64,
    /// Checksum-valid sentences (including ignored types)
    pub sentences: u64,
    /// Sentences that produced a locked fix
    pub fixes: u64,
    /// Lines dropped for a bad or missing checksum
    pub checksum_errors: u64,
    /// Lines dropped for exceeding the buffer
    pub overflows: u64,
    /// Times the configuration was re-sent by the watchdog
    pub pokes: u64,
}

/// NMEA GPS receiver over a byte transport
pub struct GpsReceiver<P: GpsPort, C: Clock> {
    port: P,
    clock: C,
    settings: ReceiverSettings,
    buffer: LineBuffer,
    fix: Fix,
    watchdog: LockWatchdog,
    stats: ReceiverStats,
}

impl<P: GpsPort, C: Clock> GpsReceiver<P, C> {
    pub fn new(port: P, clock: C, settings: ReceiverSettings) -> Self {
        Self {
            port,
            clock,
            settings,
            buffer: LineBuffer::new(),
            fix: Fix::default(),
            watchdog: LockWatchdog::new(settings.lock_loss_threshold),
            stats: ReceiverStats::default(),
        }
    }

    /// Set the line speed and send the initial configuration
    ///
    /// # Errors
    ///
    /// Returns error if the port rejects the baud rate or a write fails
    pub fn begin(&mut self) -> Result<()> {
        self.port.begin(self.settings.baud_rate)?;
        info!("GPS port configured at {} baud", self.settings.baud_rate);
        self.send_config()
    }

    /// Send the protocol selection and message enable/disable commands
    pub fn send_config(&mut self) -> Result<()> {
        for command in configuration_sequence(self.settings.baud_rate)? {
            self.port.write_all(&command)?;
            debug!(
                "Sent {}",
                String::from_utf8_lossy(&command).trim_end()
            );
        }
        Ok(())
    }

    /// Read and decode whatever the port has buffered, within the time budget
    ///
    /// # Returns
    ///
    /// * `Result<bool>` - Whether any checksum-valid sentence was decoded
    ///
    /// # Errors
    ///
    /// Returns error on transport I/O failure. Malformed input is never an
    /// error.
    pub fn update(&mut self) -> Result<bool> {
        let start = self.clock.now_ms();
        let mut decoded = false;

        while self.port.available()? {
            if self.clock.now_ms().saturating_sub(start) > self.settings.read_budget_ms {
                trace!("Read budget of {}ms spent, yielding", self.settings.read_budget_ms);
                break;
            }

            let byte = self.port.read_byte()?;
            let outcome = match self.buffer.push(byte) {
                Push::Pending => continue,
                Push::Overflow => {
                    self.stats.overflows += 1;
                    debug!("Line exceeded buffer without terminator, dropped");
                    continue;
                }
                Push::Line(line) => {
                    trace!("NMEA line: {}", String::from_utf8_lossy(line).trim_end());
                    decode_sentence(line, &self.fix)
                }
            };

            decoded |= self.handle(outcome)?;
        }

        Ok(decoded)
    }

    /// Snapshot of the last committed fix
    pub fn read_position(&self) -> Fix {
        self.fix
    }

    /// Consecutive recognized sentences without a lock
    pub fn lock_loss_count(&self) -> u32 {
        self.watchdog.count()
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    pub fn settings(&self) -> &ReceiverSettings {
        &self.settings
    }

    /// Commit the outcome of one line and run the watchdog
    fn handle(&mut self, outcome: DecodeOutcome) -> Result<bool> {
        self.stats.lines += 1;

        match &outcome {
            DecodeOutcome::NotASentence => trace!("Skipping line without '$' marker"),
            DecodeOutcome::ChecksumMismatch => {
                self.stats.checksum_errors += 1;
                debug!("Discarding line with bad checksum");
            }
            DecodeOutcome::Ignored(id) => trace!("Ignoring {} sentence", id),
            DecodeOutcome::Rejected {
                sentence, error, ..
            } => debug!("Rejected {} sentence: {}", sentence.formatter(), error),
            DecodeOutcome::Updated { sentence, .. } => {
                self.stats.fixes += 1;
                trace!("Fix updated from {} sentence", sentence.formatter());
            }
        }

        let recognized = outcome.recognized();
        let (fix, decoded) = outcome.apply(self.fix);
        self.fix = fix;

        if decoded {
            self.stats.sentences += 1;
        }

        if recognized && self.watchdog.observe(self.fix.lock) == WatchdogAction::Poke {
            self.stats.pokes += 1;
            info!(
                "No lock for {} sentences, re-sending receiver configuration",
                self.watchdog.threshold() + 1
            );
            self.send_config()?;
        }

        Ok(decoded)
    }
}

impl<P: GpsPort, C: Clock> std::fmt::Debug for GpsReceiver<P, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpsReceiver")
            .field("settings", &self.settings)
            .field("fix", &self.fix)
            .field("watchdog", &self.watchdog)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
