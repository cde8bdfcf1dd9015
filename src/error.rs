//! # Error Types
//!
//! Custom error types for QuickGPS using `thiserror`.

use thiserror::Error;

/// Main error type for QuickGPS
#[derive(Debug, Error)]
pub enum QuickGpsError {
    /// A single NMEA field could not be decoded
    #[error("Invalid NMEA field: {0}")]
    InvalidField(String),

    /// Sentence ended before a field the decoder needs
    #[error("Missing NMEA field at index {0}")]
    MissingField(usize),

    /// Outgoing command does not fit in the sentence buffer
    #[error("Command too long: {len} bytes exceeds maximum {max}")]
    CommandTooLong { len: usize, max: usize },

    /// Outgoing command is not a `$`-prefixed sentence
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Serial port configuration or open errors
    #[error("Serial port error: {0}")]
    Serial(String),

    /// None of the candidate device paths could be opened
    #[error("No GPS device found (tried: {0})")]
    SerialPortNotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for QuickGPS
pub type Result<T> = std::result::Result<T, QuickGpsError>;
