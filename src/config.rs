//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::{QuickGpsError, Result};

/// Baud rates a u-blox UART accepts through `$PUBX,41`
const SUPPORTED_BAUD_RATES: &[u32] = &[4800, 9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600];

/// Levels accepted by the tracing filter
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub receiver: ReceiverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    /// Device path, or `"auto"` to probe the usual devices
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Receiver (parser + watchdog) configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ReceiverConfig {
    /// Longest time one `update()` call may spend reading bytes
    #[serde(default = "default_read_budget_ms")]
    pub read_budget_ms: u64,

    /// Consecutive fixless sentences before the configuration is re-sent
    #[serde(default = "default_lock_loss_threshold")]
    pub lock_loss_threshold: u32,

    /// Period of the control loop driving `update()`
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files; empty logs to stdout only
    #[serde(default)]
    pub log_dir: String,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            read_budget_ms: default_read_budget_ms(),
            lock_loss_threshold: default_lock_loss_threshold(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

// Default value functions
fn default_serial_port() -> String { "auto".to_string() }
fn default_baud_rate() -> u32 { 9600 }
fn default_timeout_ms() -> u64 { 100 }

fn default_read_budget_ms() -> u64 { 2 }
fn default_lock_loss_threshold() -> u32 { 20 }
fn default_poll_interval_ms() -> u64 { 10 }

fn default_log_level() -> String { "info".to_string() }

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use quick_gps::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.serial.port.is_empty() {
            return Err(invalid("serial port cannot be empty (use \"auto\" to probe)"));
        }

        if !SUPPORTED_BAUD_RATES.contains(&self.serial.baud_rate) {
            return Err(invalid(format!(
                "baud_rate must be one of: {:?}",
                SUPPORTED_BAUD_RATES
            )));
        }

        if self.serial.timeout_ms == 0 || self.serial.timeout_ms > 10000 {
            return Err(invalid("timeout_ms must be between 1 and 10000"));
        }

        if self.receiver.read_budget_ms == 0 || self.receiver.read_budget_ms > 100 {
            return Err(invalid("read_budget_ms must be between 1 and 100"));
        }

        if self.receiver.lock_loss_threshold == 0 {
            return Err(invalid("lock_loss_threshold must be greater than 0"));
        }

        if self.receiver.poll_interval_ms == 0 || self.receiver.poll_interval_ms > 1000 {
            return Err(invalid("poll_interval_ms must be between 1 and 1000"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid(format!("log level must be one of: {}", LOG_LEVELS.join(", "))));
        }

        Ok(())
    }
}

fn invalid(msg: impl std::fmt::Display) -> QuickGpsError {
    QuickGpsError::Config(toml::de::Error::custom(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.serial.port, "auto");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.receiver.lock_loss_threshold, 20);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp_file = write_config(
            r#"
[serial]
port = "/dev/ttyUSB1"
baud_rate = 38400

[receiver]
read_budget_ms = 5
lock_loss_threshold = 50

[logging]
level = "debug"
"#,
        );

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB1");
        assert_eq!(config.serial.baud_rate, 38400);
        assert_eq!(config.serial.timeout_ms, default_timeout_ms());
        assert_eq!(config.receiver.read_budget_ms, 5);
        assert_eq!(config.receiver.lock_loss_threshold, 50);
        assert_eq!(config.receiver.poll_interval_ms, default_poll_interval_ms());
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.log_dir.is_empty());
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let temp_file = write_config("");
        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.serial.port, default_serial_port());
        assert_eq!(config.receiver.read_budget_ms, default_read_budget_ms());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/quick-gps.toml");
        assert!(matches!(result, Err(QuickGpsError::Io(_))));
    }

    #[test]
    fn test_load_malformed_toml() {
        let temp_file = write_config("[serial\nport = ");
        let result = Config::load(temp_file.path());
        assert!(matches!(result, Err(QuickGpsError::Config(_))));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp_file = write_config("[receiver]\nlock_loss_threshold = 0\n");
        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_empty_serial_port() {
        let mut config = Config::default();
        config.serial.port = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = Config::default();
        config.serial.baud_rate = 420000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_baud_rates() {
        for &baud in SUPPORTED_BAUD_RATES {
            let mut config = Config::default();
            config.serial.baud_rate = baud;
            assert!(config.validate().is_ok(), "Baud rate {} should be valid", baud);
        }
    }

    #[test]
    fn test_timeout_ms_bounds() {
        let mut config = Config::default();
        config.serial.timeout_ms = 0;
        assert!(config.validate().is_err());
        config.serial.timeout_ms = 10001;
        assert!(config.validate().is_err());
        config.serial.timeout_ms = 10000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_read_budget_bounds() {
        let mut config = Config::default();
        config.receiver.read_budget_ms = 0;
        assert!(config.validate().is_err());
        config.receiver.read_budget_ms = 101;
        assert!(config.validate().is_err());
        config.receiver.read_budget_ms = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lock_loss_threshold_zero() {
        let mut config = Config::default();
        config.receiver.lock_loss_threshold = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_bounds() {
        let mut config = Config::default();
        config.receiver.poll_interval_ms = 0;
        assert!(config.validate().is_err());
        config.receiver.poll_interval_ms = 1001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_serial_port(), "auto");
        assert_eq!(default_baud_rate(), 9600);
        assert_eq!(default_timeout_ms(), 100);
        assert_eq!(default_read_budget_ms(), 2);
        assert_eq!(default_lock_loss_threshold(), 20);
        assert_eq!(default_poll_interval_ms(), 10);
        assert_eq!(default_log_level(), "info");
    }
}
