//! # NMEA Sentence Decoder
//!
//! Turns one complete, `\n`-stripped line into a [`DecodeOutcome`].
//!
//! Fields are position-dependent: each sentence type maps fixed token
//! indices (token 0 is the talker+formatter) to a field decoder. The first
//! field that fails aborts the sentence, so a half-updated fix is never
//! committed.

use super::checksum::{split_sentence, validate};
use super::fields::*;
use super::protocol::*;
use crate::error::{QuickGpsError, Result};

/// Meaning of one mapped token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Latitude,
    NorthSouth,
    Longitude,
    EastWest,
    /// Data valid flag, must be `A`
    Status,
    Altitude,
    /// Altitude unit, must be `M`
    AltitudeUnit,
    TimeOfDay,
    /// Date, combined with the previously decoded time of day
    Date,
}

/// GLL: lat, N/S, lon, E/W, time, status
const GLL_FIELDS: &[(usize, Field)] = &[
    (1, Field::Latitude),
    (2, Field::NorthSouth),
    (3, Field::Longitude),
    (4, Field::EastWest),
    (6, Field::Status),
];

/// GGA: time, lat, N/S, lon, E/W, quality, sats, hdop, altitude, unit
const GGA_FIELDS: &[(usize, Field)] = &[
    (2, Field::Latitude),
    (3, Field::NorthSouth),
    (4, Field::Longitude),
    (5, Field::EastWest),
    (9, Field::Altitude),
    (10, Field::AltitudeUnit),
];

/// RMC: time, status, lat, N/S, lon, E/W, speed, course, date
const RMC_FIELDS: &[(usize, Field)] = &[
    (1, Field::TimeOfDay),
    (2, Field::Status),
    (3, Field::Latitude),
    (4, Field::NorthSouth),
    (5, Field::Longitude),
    (6, Field::EastWest),
    (9, Field::Date),
];

impl SentenceType {
    fn field_map(self) -> &'static [(usize, Field)] {
        match self {
            Self::Gll => GLL_FIELDS,
            Self::Gga => GGA_FIELDS,
            Self::Rmc => RMC_FIELDS,
        }
    }
}

/// Result of decoding one line
#[derive(Debug)]
pub enum DecodeOutcome {
    /// Line does not start with `$`
    NotASentence,

    /// Checksum missing or wrong; the line is discarded
    ChecksumMismatch,

    /// Checksum-valid sentence of a type this decoder does not act on
    Ignored(SentenceId),

    /// Recognized sentence with a field that failed to decode.
    ///
    /// `fix` is the previous fix with its lock cleared.
    Rejected {
        sentence: SentenceType,
        fix: Fix,
        error: QuickGpsError,
    },

    /// Every mapped field decoded; `fix` is locked
    Updated { sentence: SentenceType, fix: Fix },
}

impl DecodeOutcome {
    /// Whether the line was a checksum-valid sentence
    pub fn decoded(&self) -> bool {
        !matches!(self, Self::NotASentence | Self::ChecksumMismatch)
    }

    /// Whether the line was a checksum-valid sentence of a recognized type
    pub fn recognized(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Updated { .. })
    }

    /// Fix to commit after this outcome, given the fix before the decode
    ///
    /// Returns the `(fix, decoded)` pair.
    pub fn apply(self, current: Fix) -> (Fix, bool) {
        let decoded = self.decoded();
        let fix = match self {
            Self::Rejected { fix, .. } | Self::Updated { fix, .. } => fix,
            Self::NotASentence | Self::ChecksumMismatch | Self::Ignored(_) => current,
        };
        (fix, decoded)
    }
}

/// Decode one complete line against the current fix
///
/// # Arguments
///
/// * `line` - Sentence bytes without the trailing `\n` (a `\r` after the
///   checksum is tolerated)
/// * `current` - Fix committed before this line
///
/// # Examples
///
/// ```
/// use quick_gps::nmea::decoder::decode_sentence;
/// use quick_gps::nmea::protocol::Fix;
///
/// let line = b"$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";
/// let (fix, decoded) = decode_sentence(line, &Fix::default()).apply(Fix::default());
///
/// assert!(decoded);
/// assert!(fix.lock);
/// assert!((fix.latitude - 48.1173).abs() < 1e-4);
/// ```
pub fn decode_sentence(line: &[u8], current: &Fix) -> DecodeOutcome {
    if line.first() != Some(&NMEA_SENTENCE_MARKER) {
        return DecodeOutcome::NotASentence;
    }

    if !validate(line) {
        return DecodeOutcome::ChecksumMismatch;
    }

    let Some((body, _)) = split_sentence(line) else {
        return DecodeOutcome::ChecksumMismatch;
    };

    let mut tokens = body.split(|&b| b == NMEA_FIELD_SEPARATOR);
    let id = SentenceId::from_token(tokens.next().unwrap_or_default());

    let Some(sentence) = id.formatter().and_then(SentenceType::from_formatter) else {
        return DecodeOutcome::Ignored(id);
    };

    match decode_fields(sentence, body, current) {
        Ok(fix) => DecodeOutcome::Updated { sentence, fix },
        Err(error) => DecodeOutcome::Rejected {
            sentence,
            fix: Fix {
                lock: false,
                ..*current
            },
            error,
        },
    }
}

/// Fold every mapped field of `body` into a candidate copied from `current`
fn decode_fields(sentence: SentenceType, body: &[u8], current: &Fix) -> Result<Fix> {
    let map = sentence.field_map();
    let mut candidate = Fix {
        lock: false,
        ..*current
    };
    let mut time_of_day = None;
    let mut last_index = 0;

    for (index, token) in body.split(|&b| b == NMEA_FIELD_SEPARATOR).enumerate() {
        last_index = index;
        let Some(&(_, field)) = map.iter().find(|(i, _)| *i == index) else {
            continue;
        };

        let text = std::str::from_utf8(token).map_err(|_| {
            QuickGpsError::InvalidField(format!("non-ASCII field at index {}", index))
        })?;

        match field {
            Field::Latitude => candidate.latitude = parse_lat_lon(text)?,
            Field::NorthSouth => candidate.latitude *= parse_north_south(text)?,
            Field::Longitude => candidate.longitude = parse_lat_lon(text)?,
            Field::EastWest => candidate.longitude *= parse_east_west(text)?,
            Field::Status => expect_flag(text, 'A')?,
            Field::Altitude => candidate.altitude = parse_altitude(text)?,
            Field::AltitudeUnit => expect_flag(text, 'M')?,
            Field::TimeOfDay => time_of_day = Some(parse_time_of_day(text)?),
            Field::Date => {
                let date = parse_date(text)?;
                let time = time_of_day.ok_or(QuickGpsError::MissingField(index))?;
                candidate.time_ms = Some(combine_date_time(date, time)?);
            }
        }
    }

    if let Some(&(missing, _)) = map.iter().find(|(i, _)| *i > last_index) {
        return Err(QuickGpsError::MissingField(missing));
    }

    candidate.lock = true;
    Ok(candidate)
}
