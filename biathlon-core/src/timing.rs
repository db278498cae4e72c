//! Time of day and duration codec
//!
//! Event logs and configuration use three fixed clock formats:
//! - `HH:MM:SS.mmm` for absolute times of day
//! - `HH:MM:SS` for configured durations (the start window)
//! - `HH:MM:SS.mmm` again when rendering elapsed durations in the report

use crate::types::{CompetitionError, Duration, Result, Timestamp};
use chrono::NaiveTime;

/// Parse a time of day of the exact form `HH:MM:SS.mmm`
///
/// The grammar is strict: two-digit 24-hour fields, colon separators and
/// exactly three millisecond digits. Out-of-range fields (hour 24, minute 61)
/// are rejected.
///
/// # Example
/// ```
/// use biathlon_core::timing::parse_time_of_day;
///
/// let t = parse_time_of_day("09:30:01.250").unwrap();
/// assert_eq!(t.to_string(), "09:30:01.250");
/// assert!(parse_time_of_day("9:30:01.250").is_err());
/// ```
pub fn parse_time_of_day(s: &str) -> Result<Timestamp> {
    let malformed = || CompetitionError::MalformedTime(s.to_string());

    let bytes = s.as_bytes();
    if bytes.len() != 12 || bytes[8] != b'.' {
        return Err(malformed());
    }
    let (hour, minute, second) = split_clock(&bytes[..8]).ok_or_else(malformed)?;
    let millis = digits(&bytes[9..12]).ok_or_else(malformed)?;

    NaiveTime::from_hms_milli_opt(hour, minute, second, millis)
        .ok_or_else(malformed)
}

/// Parse a clock duration of the exact form `HH:MM:SS`
///
/// Fields follow the same ranges as a time of day, so the longest window
/// that can be expressed is `23:59:59`.
pub fn parse_clock_duration(s: &str) -> Result<Duration> {
    let malformed = || CompetitionError::MalformedDuration(s.to_string());

    let bytes = s.as_bytes();
    if bytes.len() != 8 {
        return Err(malformed());
    }
    let (hour, minute, second) = split_clock(bytes).ok_or_else(malformed)?;
    if hour > 23 || minute > 59 || second > 59 {
        return Err(malformed());
    }

    Ok(Duration::seconds(
        i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second),
    ))
}

/// Render a duration as `HH:MM:SS.mmm`
///
/// The duration is rounded to the nearest millisecond first. Hours are not
/// capped, the field simply widens past 99. A negative duration (only
/// possible with out-of-order input) renders with a leading `-`.
pub fn format_duration(d: Duration) -> String {
    let total_ms = round_to_millis(d);
    let sign = if total_ms < 0 { "-" } else { "" };
    let total_ms = total_ms.unsigned_abs();

    let millis = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Format a time of day the same way event logs write it
pub fn format_time_of_day(t: Timestamp) -> String {
    t.format("%H:%M:%S%.3f").to_string()
}

/// Duration in fractional seconds
pub fn duration_secs(d: Duration) -> f64 {
    match d.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1_000_000_000.0,
        None => d.num_milliseconds() as f64 / 1_000.0,
    }
}

fn round_to_millis(d: Duration) -> i64 {
    match d.num_nanoseconds() {
        Some(nanos) => {
            let ms = nanos.div_euclid(1_000_000);
            if nanos.rem_euclid(1_000_000) >= 500_000 {
                ms + 1
            } else {
                ms
            }
        }
        None => d.num_milliseconds(),
    }
}

/// Split `HH:MM:SS` into its three numeric fields
fn split_clock(bytes: &[u8]) -> Option<(u32, u32, u32)> {
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
        return None;
    }
    Some((
        digits(&bytes[0..2])?,
        digits(&bytes[3..5])?,
        digits(&bytes[6..8])?,
    ))
}

fn digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
    })
}
