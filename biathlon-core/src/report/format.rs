//! Numeric and field formatting for report lines
//!
//! Speeds are truncated, never rounded, to three decimals. Durations use the
//! `HH:MM:SS.mmm` codec from [`crate::timing`].

use super::LapSummary;
use crate::timing::{duration_secs, format_duration};
use crate::types::{CompetitorStatus, Duration};

/// Placeholder for a lap or penalty block with no data
pub const EMPTY_LAP: &str = "{,}";

/// Average speed in meters per second; zero for a non-positive duration
pub fn average_speed(duration: Duration, meters: f64) -> f64 {
    if duration > Duration::zero() {
        meters / duration_secs(duration)
    } else {
        0.0
    }
}

/// Drop every digit past `precision` decimals without rounding up
pub fn truncate(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).trunc() / factor
}

/// Speed truncated and printed with exactly three decimals
pub fn format_speed(speed: f64) -> String {
    format!("{:.3}", truncate(speed, 3))
}

/// `{HH:MM:SS.mmm, speed}`, or `{,}` when there is no lap
pub fn format_lap(lap: Option<&LapSummary>) -> String {
    match lap {
        Some(lap) => format!("{{{}, {}}}", format_duration(lap.time), format_speed(lap.speed)),
        None => EMPTY_LAP.to_string(),
    }
}

/// Every lap slot joined with `, ` inside brackets
pub fn format_laps(laps: &[Option<LapSummary>]) -> String {
    let parts: Vec<String> = laps.iter().map(|lap| format_lap(lap.as_ref())).collect();
    format!("[{}]", parts.join(", "))
}

/// Status-dependent leading field of a report line
pub fn format_total_time(status: CompetitorStatus, total: Duration) -> String {
    match status {
        CompetitorStatus::NotStarted => "[NotStarted]".to_string(),
        CompetitorStatus::NotFinished => "[NotFinished]".to_string(),
        CompetitorStatus::Finished | CompetitorStatus::Racing => {
            format!("[{}]", format_duration(total))
        }
    }
}
