//! # Serial Communication Module
//!
//! Handles the serial link to the GPS receiver.
//!
//! This module handles:
//! - Locating and opening the receiver's serial device
//! - Exposing it as a non-blocking, byte-at-a-time [`GpsPort`]

pub mod port_trait;

pub use port_trait::{GpsPort, SerialGpsPort};

use std::time::Duration;

use crate::config::SerialConfig;
use crate::error::{QuickGpsError, Result};
use tracing::{debug, info, warn};

/// Default NMEA baud rate of u-blox receivers
pub const GPS_DEFAULT_BAUD_RATE: u32 = 9600;

/// Port setting that selects device auto-detection
pub const AUTO_DETECT_PORT: &str = "auto";

/// Default GPS device paths to try (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // u-blox USB CDC
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// GPS Serial Port Handler
///
/// Owns the opened device until it is handed to a receiver.
pub struct GpsSerial {
    /// Serial port handle
    port: SerialGpsPort,
    /// Device path (e.g., /dev/ttyACM0)
    device_path: String,
}

impl std::fmt::Debug for GpsSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpsSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl GpsSerial {
    /// Open the device named in the configuration
    ///
    /// A port of `"auto"` probes the default device paths.
    ///
    /// # Errors
    ///
    /// Returns error if no device could be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quick_gps::config::Config;
    /// use quick_gps::serial::GpsSerial;
    ///
    /// let config = Config::default();
    /// let serial = GpsSerial::open(&config.serial)?;
    /// println!("Connected to: {}", serial.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        if config.port == AUTO_DETECT_PORT {
            Self::open_with_paths(DEFAULT_DEVICE_PATHS, config.baud_rate, timeout)
        } else {
            Self::open_with_paths(&[config.port.as_str()], config.baud_rate, timeout)
        }
    }

    /// Open the first device that succeeds from a list of paths
    ///
    /// # Arguments
    ///
    /// * `paths` - Device paths to try (e.g., &["/dev/ttyACM0"])
    /// * `baud_rate` - Initial line speed
    /// * `timeout` - Read/write timeout of the device
    pub fn open_with_paths(paths: &[&str], baud_rate: u32, timeout: Duration) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate, timeout) {
                Ok(port) => {
                    info!("Successfully opened GPS device at {} ({} baud)", path, baud_rate);
                    return Ok(Self {
                        port: SerialGpsPort::new(port),
                        device_path: path.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(QuickGpsError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port with 8N1 settings
    fn open_port(
        path: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<Box<dyn tokio_serial::SerialPort>> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .timeout(timeout)
            .open()
            .map_err(|e| QuickGpsError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Hand the opened port over to a receiver
    pub fn into_port(self) -> SerialGpsPort {
        self.port
    }
}
