use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};

use crate::consts::SECONDS_PER_FILENAME_TICK;
use crate::error::{FieldRotError, Result};

/// `YYYY-MM-DD-HHMM_S`
const PATTERN_LEN: usize = 17;

/// Byte-class template for the capture timestamp: `d` = ASCII digit, anything else is literal.
const TEMPLATE: &[u8; PATTERN_LEN] = b"dddd-dd-dd-dddd_d";

/// Extract the capture instant from a file name such as
/// `2020-08-22-1315_4-U-RGB-Jup.tif`.
///
/// The trailing digit counts tenths of a minute, so `_4` means 24 seconds.
/// Only the first substring matching the template is considered.
pub fn parse_capture_time(name: &str) -> Result<DateTime<Utc>> {
    let malformed = || FieldRotError::MalformedFilename(name.to_string());

    let bytes = name.as_bytes();
    let start = find_template(bytes).ok_or_else(malformed)?;
    let field = |from: usize, len: usize| -> u32 {
        bytes[start + from..start + from + len]
            .iter()
            .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
    };

    let year = field(0, 4) as i32;
    let month = field(5, 2);
    let day = field(8, 2);
    let hour = field(11, 2);
    let minute = field(13, 2);
    let tick = field(16, 1);
    let second = (f64::from(tick) * SECONDS_PER_FILENAME_TICK).round() as u32;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(malformed)
}

/// Canonical file stem for an instant, the inverse of [`parse_capture_time`].
///
/// Seconds are truncated to the tenth-of-a-minute tick they fall in.
pub fn format_capture_name(instant: &DateTime<Utc>) -> String {
    let tick = (f64::from(instant.second()) / SECONDS_PER_FILENAME_TICK).floor() as u32;
    format!(
        "{:04}-{:02}-{:02}-{:02}{:02}_{}",
        instant.year(),
        instant.month(),
        instant.day(),
        instant.hour(),
        instant.minute(),
        tick
    )
}

fn find_template(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < PATTERN_LEN {
        return None;
    }
    (0..=bytes.len() - PATTERN_LEN).find(|&start| {
        bytes[start..start + PATTERN_LEN]
            .iter()
            .zip(TEMPLATE.iter())
            .all(|(&b, &t)| if t == b'd' { b.is_ascii_digit() } else { b == t })
    })
}
