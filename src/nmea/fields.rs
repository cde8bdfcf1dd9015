//! # NMEA Field Decoders
//!
//! Pure conversions from one comma-separated field to a typed value. Every
//! decoder is total: malformed input is an `InvalidField` error, never a
//! panic.

use chrono::NaiveDate;

use crate::error::{QuickGpsError, Result};

/// Two-digit years are interpreted in this century
const NMEA_CENTURY: i32 = 2000;

/// UTC time of day from an RMC sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Sub-second offset in milliseconds
    pub millis: u32,
}

/// Calendar date from an RMC sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub day: u32,
    /// Month of the year, 1-12
    pub month: u32,
    pub year: i32,
}

/// Parse a `DDMM.mmmm` latitude or `DDDMM.mmmm` longitude into degrees
///
/// The width of the integer part selects the degree digits: four integer
/// digits carry two degree digits, five carry three. Everything after the
/// degrees is decimal minutes.
///
/// # Examples
///
/// ```
/// use quick_gps::nmea::fields::parse_lat_lon;
///
/// let lat = parse_lat_lon("4916.4510").unwrap();
/// assert!((lat - (49.0 + 16.4510 / 60.0)).abs() < 1e-5);
///
/// let lon = parse_lat_lon("12311.12000").unwrap();
/// assert!((lon - (123.0 + 11.12 / 60.0)).abs() < 1e-4);
///
/// assert!(parse_lat_lon("48.07038").is_err());
/// ```
pub fn parse_lat_lon(field: &str) -> Result<f32> {
    let (int_part, frac_part) = field
        .split_once('.')
        .ok_or_else(|| invalid("coordinate", field))?;

    let degree_digits = match int_part.len() {
        4 => 2,
        5 => 3,
        _ => return Err(invalid("coordinate", field)),
    };

    if !is_digits(int_part) || frac_part.is_empty() || !is_digits(frac_part) {
        return Err(invalid("coordinate", field));
    }

    let degrees: f64 = field[..degree_digits]
        .parse()
        .map_err(|_| invalid("coordinate degrees", field))?;
    let minutes: f64 = field[degree_digits..]
        .parse()
        .map_err(|_| invalid("coordinate minutes", field))?;

    Ok((degrees + minutes / 60.0) as f32)
}

/// Parse a latitude hemisphere into the sign to apply (`N` → 1, `S` → -1)
pub fn parse_north_south(field: &str) -> Result<f32> {
    match field {
        "N" => Ok(1.0),
        "S" => Ok(-1.0),
        _ => Err(invalid("latitude hemisphere", field)),
    }
}

/// Parse a longitude hemisphere into the sign to apply (`E` → 1, `W` → -1)
pub fn parse_east_west(field: &str) -> Result<f32> {
    match field {
        "E" => Ok(1.0),
        "W" => Ok(-1.0),
        _ => Err(invalid("longitude hemisphere", field)),
    }
}

/// Parse `HHMMSS.ss` (or bare `HHMMSS`) into a time of day
///
/// The two digits after the decimal point are hundredths of a second.
pub fn parse_time_of_day(field: &str) -> Result<TimeOfDay> {
    if !field.is_ascii() {
        return Err(invalid("time of day", field));
    }

    let millis = match field.len() {
        6 => 0,
        9 if field.as_bytes()[6] == b'.' => {
            two_digits(&field[7..9]).ok_or_else(|| invalid("time of day", field))? * 10
        }
        _ => return Err(invalid("time of day", field)),
    };

    let hour = two_digits(&field[0..2]).ok_or_else(|| invalid("hour", field))?;
    let minute = two_digits(&field[2..4]).ok_or_else(|| invalid("minute", field))?;
    let second = two_digits(&field[4..6]).ok_or_else(|| invalid("second", field))?;

    if hour > 23 || minute > 59 || second > 59 {
        return Err(invalid("time of day", field));
    }

    Ok(TimeOfDay {
        hour,
        minute,
        second,
        millis,
    })
}

/// Parse `DDMMYY` into a calendar date in the 2000s
pub fn parse_date(field: &str) -> Result<CalendarDate> {
    if field.len() != 6 || !field.is_ascii() {
        return Err(invalid("date", field));
    }

    let day = two_digits(&field[0..2]).ok_or_else(|| invalid("day", field))?;
    let month = two_digits(&field[2..4]).ok_or_else(|| invalid("month", field))?;
    let year = two_digits(&field[4..6]).ok_or_else(|| invalid("year", field))?;

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return Err(invalid("date", field));
    }

    Ok(CalendarDate {
        day,
        month,
        year: NMEA_CENTURY + year as i32,
    })
}

/// Combine a calendar date and a time of day into UTC epoch milliseconds
///
/// # Errors
///
/// Returns `InvalidField` for dates that do not exist (e.g. 30 February).
///
/// # Examples
///
/// ```
/// use quick_gps::nmea::fields::{combine_date_time, parse_date, parse_time_of_day};
///
/// let date = parse_date("010170").unwrap(); // 2070-01-01
/// let time = parse_time_of_day("000000.50").unwrap();
/// let ms = combine_date_time(date, time).unwrap();
/// assert_eq!(ms % 1000, 500);
/// ```
pub fn combine_date_time(date: CalendarDate, time: TimeOfDay) -> Result<i64> {
    let instant = NaiveDate::from_ymd_opt(date.year, date.month, date.day)
        .and_then(|d| d.and_hms_milli_opt(time.hour, time.minute, time.second, time.millis))
        .ok_or_else(|| {
            QuickGpsError::InvalidField(format!("no such instant: {:?} {:?}", date, time))
        })?;

    Ok(instant.and_utc().timestamp_millis())
}

/// Parse an altitude in meters
pub fn parse_altitude(field: &str) -> Result<f32> {
    match field.parse::<f32>() {
        Ok(altitude) if altitude.is_finite() => Ok(altitude),
        _ => Err(invalid("altitude", field)),
    }
}

/// Require a field to be exactly one expected character
pub fn expect_flag(field: &str, expected: char) -> Result<()> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c == expected => Ok(()),
        _ => Err(QuickGpsError::InvalidField(format!(
            "expected flag {:?}, got {:?}",
            expected, field
        ))),
    }
}

fn invalid(what: &str, field: &str) -> QuickGpsError {
    QuickGpsError::InvalidField(format!("{} {:?}", what, field))
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn two_digits(s: &str) -> Option<u32> {
    if s.len() == 2 && is_digits(s) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f64) -> bool {
        (a as f64 - b).abs() < 1e-5
    }

    #[test]
    fn test_parse_latitude_two_degree_digits() {
        let lat = parse_lat_lon("4916.4510").unwrap();
        assert!(approx(lat, 49.0 + 16.4510 / 60.0));

        let lat = parse_lat_lon("4717.11437").unwrap();
        assert!(approx(lat, 47.0 + 17.11437 / 60.0));
    }

    #[test]
    fn test_parse_longitude_three_degree_digits() {
        let lon = parse_lat_lon("00833.91522").unwrap();
        assert!(approx(lon, 8.0 + 33.91522 / 60.0));

        let lon = parse_lat_lon("01131.000").unwrap();
        assert!(approx(lon, 11.0 + 31.0 / 60.0));
    }

    #[test]
    fn test_parse_lat_lon_rejects_bad_shapes() {
        for field in [
            "",
            "4807",
            "4807038",
            "48.07038",
            "480.7038",
            "480703.8",
            "4807.",
            ".4807",
            "48X7.038",
            "4807.0-8",
            "-807.038",
            "4807.038,N",
        ] {
            assert!(parse_lat_lon(field).is_err(), "{:?} should fail", field);
        }
    }

    #[test]
    fn test_parse_hemispheres() {
        assert_eq!(parse_north_south("N").unwrap(), 1.0);
        assert_eq!(parse_north_south("S").unwrap(), -1.0);
        assert_eq!(parse_east_west("E").unwrap(), 1.0);
        assert_eq!(parse_east_west("W").unwrap(), -1.0);
    }

    #[test]
    fn test_parse_hemispheres_reject_wrong_axis_and_length() {
        assert!(parse_north_south("E").is_err());
        assert!(parse_north_south("").is_err());
        assert!(parse_north_south("NN").is_err());
        assert!(parse_north_south("n").is_err());
        assert!(parse_east_west("S").is_err());
        assert!(parse_east_west("EW").is_err());
    }

    #[test]
    fn test_parse_time_of_day_with_hundredths() {
        let t = parse_time_of_day("083559.25").unwrap();
        assert_eq!(
            t,
            TimeOfDay {
                hour: 8,
                minute: 35,
                second: 59,
                millis: 250
            }
        );
    }

    #[test]
    fn test_parse_time_of_day_whole_seconds() {
        let t = parse_time_of_day("123519").unwrap();
        assert_eq!((t.hour, t.minute, t.second, t.millis), (12, 35, 19, 0));
    }

    #[test]
    fn test_parse_time_of_day_rejects_bad_input() {
        for field in [
            "",
            "12351",
            "1235190",
            "123519.2",
            "123519.250",
            "123519,25",
            "12a519.00",
            "246000.00",
            "126000.00",
            "123560.00",
            "1235\u{e9}.0",
        ] {
            assert!(parse_time_of_day(field).is_err(), "{:?} should fail", field);
        }
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("230394").unwrap();
        assert_eq!(
            d,
            CalendarDate {
                day: 23,
                month: 3,
                year: 2094
            }
        );
    }

    #[test]
    fn test_parse_date_rejects_bad_input() {
        for field in ["", "23039", "2303941", "23o394", "001299", "231394", "230094"] {
            assert!(parse_date(field).is_err(), "{:?} should fail", field);
        }
    }

    #[test]
    fn test_combine_date_time() {
        let date = parse_date("091202").unwrap();
        let time = parse_time_of_day("083559.00").unwrap();
        assert_eq!(combine_date_time(date, time).unwrap(), 1_039_422_959_000);
    }

    #[test]
    fn test_combine_date_time_adds_millis() {
        let date = parse_date("230394").unwrap();
        let time = parse_time_of_day("123519.42").unwrap();
        assert_eq!(combine_date_time(date, time).unwrap(), 3_920_186_119_420);
    }

    #[test]
    fn test_combine_date_time_rejects_impossible_date() {
        let date = parse_date("300224").unwrap();
        let time = parse_time_of_day("000000").unwrap();
        assert!(combine_date_time(date, time).is_err());
    }

    #[test]
    fn test_parse_altitude() {
        assert_eq!(parse_altitude("545.4").unwrap(), 545.4);
        assert_eq!(parse_altitude("-12.0").unwrap(), -12.0);
        assert!(parse_altitude("").is_err());
        assert!(parse_altitude("M").is_err());
        assert!(parse_altitude("12.3m").is_err());
        assert!(parse_altitude("inf").is_err());
        assert!(parse_altitude("NaN").is_err());
    }

    #[test]
    fn test_expect_flag() {
        assert!(expect_flag("A", 'A').is_ok());
        assert!(expect_flag("M", 'M').is_ok());
        assert!(expect_flag("V", 'A').is_err());
        assert!(expect_flag("", 'A').is_err());
        assert!(expect_flag("AA", 'A').is_err());
    }
}
