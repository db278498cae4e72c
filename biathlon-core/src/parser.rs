//! Event log line parser
//!
//! Each line of an event log has the form
//! `[HH:MM:SS.mmm] event-id competitor-id [extra parameter...]`.

use crate::timing::parse_time_of_day;
use crate::types::{CompetitionError, EventKind, RaceEvent, Result};

/// Parse one event log line into a [`RaceEvent`]
///
/// Tokens beyond the competitor id are joined with single spaces and kept
/// as the extra parameter, so free-text reasons survive intact.
///
/// # Example
/// ```
/// use biathlon_core::{parse_event_line, EventKind};
///
/// let event = parse_event_line("[09:59:45.000] 11 3 Lost in the forest").unwrap();
/// assert_eq!(event.kind, EventKind::Abandon);
/// assert_eq!(event.competitor_id, 3);
/// assert_eq!(event.extra(), "Lost in the forest");
/// ```
pub fn parse_event_line(line: &str) -> Result<RaceEvent> {
    let line = line.trim();
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(CompetitionError::MalformedLine(format!(
            "insufficient number of parameters in line ({})",
            line
        )));
    }

    let time = parse_time_of_day(parts[0].trim_matches(|c: char| c == '[' || c == ']'))?;

    let event_id: u32 = parts[1].parse().map_err(|_| {
        CompetitionError::MalformedLine(format!("can't convert eventId({}) to int", parts[1]))
    })?;
    let kind = EventKind::try_from(event_id)?;

    let competitor_id: u32 = parts[2].parse().map_err(|_| {
        CompetitionError::MalformedLine(format!(
            "can't convert competitorId({}) to int",
            parts[2]
        ))
    })?;

    let mut event = RaceEvent::new(kind, competitor_id, time);
    if parts.len() > 3 {
        event = event.with_extra(parts[3..].join(" "));
    }
    Ok(event)
}
