//! # NMEA Checksum
//!
//! XOR checksum over the sentence body: every byte strictly between the
//! leading `$` and the `*` delimiter. Rendered on the wire as two uppercase
//! hex digits after `*`.

use super::protocol::*;
use crate::error::{QuickGpsError, Result};

/// Uppercase hex digits used to render a checksum
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Length of `*XX` appended to a command
const CHECKSUM_SUFFIX_LEN: usize = 3;

/// Calculate the XOR checksum of a sentence body
///
/// # Arguments
///
/// * `body` - Bytes between `$` and `*` (both excluded)
///
/// # Examples
///
/// ```
/// use quick_gps::nmea::checksum::checksum;
///
/// assert_eq!(checksum(b"GPRMC,123519"), 0x6A);
/// ```
pub fn checksum(body: &[u8]) -> u8 {
    body.iter().fold(0u8, |acc, &byte| acc ^ byte)
}

/// Split a line into its checksummed body and the tail after `*`
///
/// Returns `None` if the line does not start with `$` or has no `*`. The
/// search never leaves `line`, so an unterminated sentence is a plain
/// failure rather than a read past the buffer.
pub fn split_sentence(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let rest = line.strip_prefix(&[NMEA_SENTENCE_MARKER])?;
    let star = rest.iter().position(|&b| b == NMEA_CHECKSUM_DELIMITER)?;
    Some((&rest[..star], &rest[star + 1..]))
}

/// Check a received line against its checksum suffix
///
/// The two bytes after `*` must be uppercase hex digits equal to the XOR of
/// the body. Anything after them (a trailing `\r`) is ignored.
///
/// # Examples
///
/// ```
/// use quick_gps::nmea::checksum::validate;
///
/// assert!(validate(b"$GPRMC,123519*6A"));
/// assert!(!validate(b"$GPRMC,123519*6B"));
/// assert!(!validate(b"$GPRMC,123519"));
/// ```
pub fn validate(line: &[u8]) -> bool {
    let Some((body, tail)) = split_sentence(line) else {
        return false;
    };

    match tail {
        [hi, lo, ..] => match (hex_value(*hi), hex_value(*lo)) {
            (Some(hi), Some(lo)) => (hi << 4 | lo) == checksum(body),
            _ => false,
        },
        _ => false,
    }
}

/// Append `*XX\r\n` to an outgoing `$`-prefixed command
///
/// The checksum covers every byte after the `$`.
///
/// # Errors
///
/// Returns `InvalidCommand` if the command does not start with `$`, and
/// `CommandTooLong` if the finished command would not fit in
/// [`NMEA_BUFFER_SIZE`]. Both indicate a caller bug; commands are built from
/// constants, never from received data.
///
/// # Examples
///
/// ```
/// use quick_gps::nmea::checksum::append_checksum;
///
/// let cmd = append_checksum("$PUBX,40,GSV,0,0,0,0,0,0").unwrap();
/// assert_eq!(cmd, b"$PUBX,40,GSV,0,0,0,0,0,0*59\r\n");
/// ```
pub fn append_checksum(command: &str) -> Result<Vec<u8>> {
    let body = command
        .as_bytes()
        .strip_prefix(&[NMEA_SENTENCE_MARKER])
        .ok_or_else(|| QuickGpsError::InvalidCommand(format!("missing '$' in {:?}", command)))?;

    let len = command.len() + CHECKSUM_SUFFIX_LEN + NMEA_COMMAND_TERMINATOR.len();
    if len > NMEA_BUFFER_SIZE {
        return Err(QuickGpsError::CommandTooLong {
            len,
            max: NMEA_BUFFER_SIZE,
        });
    }

    let cs = checksum(body);
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(command.as_bytes());
    out.push(NMEA_CHECKSUM_DELIMITER);
    out.push(HEX_DIGITS[(cs >> 4) as usize]);
    out.push(HEX_DIGITS[(cs & 0x0F) as usize]);
    out.extend_from_slice(NMEA_COMMAND_TERMINATOR.as_bytes());

    Ok(out)
}

/// Value of one uppercase hex digit
fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
