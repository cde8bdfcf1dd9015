//! # NMEA Protocol Constants and Types
//!
//! Core definitions shared by the checksum codec, field decoders and the
//! sentence decoder.

use serde::Serialize;

/// Start-of-sentence marker
pub const NMEA_SENTENCE_MARKER: u8 = b'$';

/// Separator between the sentence body and its checksum
pub const NMEA_CHECKSUM_DELIMITER: u8 = b'*';

/// Field separator
pub const NMEA_FIELD_SEPARATOR: u8 = b',';

/// Line terminator that completes a sentence on the wire
pub const NMEA_LINE_TERMINATOR: u8 = b'\n';

/// Terminator appended to outgoing commands
pub const NMEA_COMMAND_TERMINATOR: &str = "\r\n";

/// Capacity of the sentence buffer, in bytes.
///
/// NMEA-0183 limits a sentence to 82 characters including `$` and CRLF;
/// the extra room absorbs proprietary u-blox sentences.
pub const NMEA_BUFFER_SIZE: usize = 100;

/// Length of the talker prefix (`GP`, `GN`, `GL`, ...)
pub const NMEA_TALKER_LEN: usize = 2;

/// Length of the sentence formatter (`RMC`, `GGA`, ...)
pub const NMEA_FORMATTER_LEN: usize = 3;

/// Sentence types this decoder acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceType {
    /// Geographic position, latitude/longitude
    Gll,
    /// Fix data with altitude
    Gga,
    /// Recommended minimum navigation data (time, date, position)
    Rmc,
}

impl SentenceType {
    /// Resolve a sentence type from its three-letter formatter
    pub fn from_formatter(formatter: &[u8]) -> Option<Self> {
        match formatter {
            b"GLL" => Some(Self::Gll),
            b"GGA" => Some(Self::Gga),
            b"RMC" => Some(Self::Rmc),
            _ => None,
        }
    }

    /// Three-letter formatter as sent on the wire
    pub fn formatter(self) -> &'static str {
        match self {
            Self::Gll => "GLL",
            Self::Gga => "GGA",
            Self::Rmc => "RMC",
        }
    }
}

/// Talker + formatter of a checksum-valid sentence, kept for logging
/// sentences the decoder does not act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceId {
    bytes: [u8; NMEA_TALKER_LEN + NMEA_FORMATTER_LEN],
    len: usize,
}

impl SentenceId {
    /// Take up to five identifier bytes from the first token of a sentence
    pub fn from_token(token: &[u8]) -> Self {
        let mut bytes = [0u8; NMEA_TALKER_LEN + NMEA_FORMATTER_LEN];
        let len = token.len().min(bytes.len());
        bytes[..len].copy_from_slice(&token[..len]);
        Self { bytes, len }
    }

    /// Identifier as text (lossy for non-ASCII input)
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or("?")
    }

    /// Formatter part (after the talker), if present
    pub fn formatter(&self) -> Option<&[u8]> {
        if self.len == NMEA_TALKER_LEN + NMEA_FORMATTER_LEN {
            Some(&self.bytes[NMEA_TALKER_LEN..])
        } else {
            None
        }
    }
}

impl std::fmt::Display for SentenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded position/time/lock snapshot
///
/// A value type: the decoder builds a new `Fix` from a copy of the previous
/// one and the receiver replaces its stored fix in a single assignment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Fix {
    /// UTC time in milliseconds since the Unix epoch (`None` until an RMC
    /// sentence has been decoded)
    pub time_ms: Option<i64>,

    /// Longitude in degrees (east positive)
    pub longitude: f32,

    /// Latitude in degrees (north positive)
    pub latitude: f32,

    /// Altitude above mean sea level in meters
    pub altitude: f32,

    /// Whether the most recently decoded sentence fully validated
    pub lock: bool,
}
