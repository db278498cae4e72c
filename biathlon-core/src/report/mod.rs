//! Final standings report
//!
//! Turns competitor records into one row per competitor, sorted by total
//! time. Each row renders as
//! `[total] id [{lap, speed}, ...] {penalty, speed} hits/shots`.

pub mod format;

use crate::competitor::Competitor;
use crate::config::RaceConfig;
use crate::timing::format_duration;
use crate::types::{CompetitorStatus, Duration, Result};
use format::{average_speed, format_lap, format_laps, format_total_time, truncate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::Write;

/// Time and average speed of one lap or of all penalty laps together
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LapSummary {
    #[serde(serialize_with = "serialize_duration")]
    pub time: Duration,
    #[serde(serialize_with = "serialize_speed")]
    pub speed: f64,
}

/// One line of the final report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub competitor_id: u32,
    pub status: CompetitorStatus,
    #[serde(serialize_with = "serialize_duration")]
    pub total_time: Duration,
    /// One slot per configured lap; `None` for laps not run
    pub laps: Vec<Option<LapSummary>>,
    /// `None` when no penalty time and no penalty speed were recorded
    pub penalty: Option<LapSummary>,
    pub hits: usize,
    pub shots: usize,
}

impl ReportRow {
    /// Build the row for one competitor
    pub fn from_competitor(competitor: &Competitor, config: &RaceConfig) -> Self {
        let shots = competitor.shots();
        let hits = competitor.hit_count();
        let misses = shots.saturating_sub(hits);

        let penalty_time = competitor.penalty_time();
        let penalty_speed = average_speed(
            penalty_time,
            f64::from(config.penalty_len) * misses as f64,
        );
        let penalty = if penalty_time == Duration::zero() && penalty_speed == 0.0 {
            None
        } else {
            Some(LapSummary {
                time: penalty_time,
                speed: penalty_speed,
            })
        };

        let laps = (0..config.laps as usize)
            .map(|i| {
                let time = competitor.lap_times().get(i)?;
                let speed = competitor.lap_speeds().get(i)?;
                Some(LapSummary {
                    time: *time,
                    speed: *speed,
                })
            })
            .collect();

        Self {
            competitor_id: competitor.id(),
            status: competitor.status(),
            total_time: competitor.total_time(),
            laps,
            penalty,
            hits,
            shots,
        }
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}/{}",
            format_total_time(self.status, self.total_time),
            self.competitor_id,
            format_laps(&self.laps),
            format_lap(self.penalty.as_ref()),
            self.hits,
            self.shots
        )
    }
}

/// Produce report rows sorted ascending by total time
///
/// The sort is stable, so competitors with equal total times keep the order
/// they are supplied in (ascending identifier when coming from a
/// [`crate::Competition`]).
pub fn generate_report<'a, I>(competitors: I, config: &RaceConfig) -> Vec<ReportRow>
where
    I: IntoIterator<Item = &'a Competitor>,
{
    let mut sorted: Vec<&Competitor> = competitors.into_iter().collect();
    sorted.sort_by_key(|c| c.total_time());

    sorted
        .into_iter()
        .map(|c| {
            let row = ReportRow::from_competitor(c, config);
            log::trace!("Report row: {}", row);
            row
        })
        .collect()
}

/// Render every row as a report line
pub fn report_lines(rows: &[ReportRow]) -> Vec<String> {
    rows.iter().map(ToString::to_string).collect()
}

/// Write one line per row to `writer`
///
/// # Returns
/// * `Err(CompetitionError::WriteFailure)` if the sink fails
pub fn write_report<W: Write>(writer: &mut W, rows: &[ReportRow]) -> Result<()> {
    for row in rows {
        writeln!(writer, "{}", row)?;
    }
    writer.flush()?;
    Ok(())
}

fn serialize_duration<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&format_duration(*d))
}

fn serialize_speed<S: Serializer>(speed: &f64, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(truncate(*speed, 3))
}
