//! Competition state machine
//!
//! This module provides the primary interface of the library. A
//! `Competition` owns every competitor record and folds race events into
//! them one at a time, in input order. Once all events are applied the
//! report is produced from the same value.

use crate::competitor::Competitor;
use crate::config::RaceConfig;
use crate::report::{generate_report, ReportRow};
use crate::timing::{format_time_of_day, parse_time_of_day};
use crate::types::{
    CompetitionError, CompetitorStatus, Duration, EventKind, RaceEvent, Result, Timestamp,
    TARGETS_PER_FIRING_LINE,
};
use std::collections::BTreeMap;

/// Race state: the configuration plus one record per registered competitor
#[derive(Debug)]
pub struct Competition {
    config: RaceConfig,
    /// Race start, the origin of competitors without a drawn start time
    origin: Timestamp,
    competitors: BTreeMap<u32, Competitor>,
}

impl Competition {
    /// Create an empty competition
    ///
    /// The configuration is validated up front so that a bad lap count or
    /// clock string is reported before the first event.
    ///
    /// # Example
    /// ```
    /// use biathlon_core::{Competition, EventKind, RaceConfig, RaceEvent};
    /// use biathlon_core::timing::parse_time_of_day;
    ///
    /// let mut competition = Competition::new(RaceConfig::new().with_laps(1)).unwrap();
    /// let at = parse_time_of_day("09:05:59.867").unwrap();
    /// competition.apply_event(&RaceEvent::new(EventKind::Register, 1, at)).unwrap();
    /// assert_eq!(competition.len(), 1);
    /// ```
    pub fn new(config: RaceConfig) -> Result<Self> {
        config.validate()?;
        let origin = config.scheduled_start()?;
        Ok(Self {
            config,
            origin,
            competitors: BTreeMap::new(),
        })
    }

    /// Look up a competitor by identifier
    pub fn competitor(&self, id: u32) -> Option<&Competitor> {
        self.competitors.get(&id)
    }

    /// All competitors in ascending identifier order
    pub fn competitors(&self) -> impl Iterator<Item = &Competitor> {
        self.competitors.values()
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    /// Build the final standings from the current state
    pub fn report(&self) -> Vec<ReportRow> {
        generate_report(self.competitors(), &self.config)
    }

    /// Apply one event to the competitor it addresses
    ///
    /// On error the event is abandoned; fields already updated by the same
    /// event are not rolled back, but every check that can fail runs before
    /// the first mutation. A status change for a competitor that already has
    /// a final outcome is ignored with a warning rather than failing.
    pub fn apply_event(&mut self, event: &RaceEvent) -> Result<()> {
        let id = event.competitor_id;
        log::debug!(
            "[{}] {} for competitor {}",
            format_time_of_day(event.time),
            event.kind,
            id
        );

        match event.kind {
            EventKind::Register => {
                if self.competitors.contains_key(&id) {
                    return Err(CompetitionError::AlreadyRegistered(id));
                }
                let competitor = Competitor::new(
                    id,
                    self.origin,
                    self.config.laps,
                    self.config.target_count(),
                );
                self.competitors.insert(id, competitor);
            }

            EventKind::SetScheduledStart => {
                let start = parse_time_of_day(event.extra())?;
                lookup(&mut self.competitors, id)?.set_start(start);
            }

            EventKind::OnStartLine => {
                lookup(&mut self.competitors, id)?;
            }

            EventKind::ActualStart => {
                let window = self.config.start_window()?;
                let competitor = lookup(&mut self.competitors, id)?;
                let diff = event.time.signed_duration_since(competitor.last_split());

                // Total time is pinned to the window itself, not the actual lateness
                if diff > window || diff < Duration::zero() {
                    log::warn!(
                        "Competitor {} started {}s off schedule (window {}s)",
                        id,
                        diff.num_seconds(),
                        window.num_seconds()
                    );
                    settle(competitor, CompetitorStatus::NotStarted, window);
                }
            }

            EventKind::OnFiringRange => {
                let range = parse_number(event)?;
                let firing_lines = self.config.firing_lines;
                if range == 0 || range > firing_lines {
                    return Err(CompetitionError::InvalidFiringRange {
                        competitor: id,
                        range,
                        firing_lines,
                    });
                }
                lookup(&mut self.competitors, id)?.enter_range((range - 1) as usize);
            }

            EventKind::TargetHit => {
                let target = parse_number(event)?;
                let capacity = self.config.target_count();
                let competitor = lookup(&mut self.competitors, id)?;

                let index = (TARGETS_PER_FIRING_LINE * competitor.current_range()) as i64
                    + i64::from(target)
                    - 1;
                let on_line = (1..=TARGETS_PER_FIRING_LINE as u32).contains(&target);
                if !on_line || index >= capacity as i64 {
                    return Err(CompetitionError::InvalidTarget {
                        competitor: id,
                        index,
                        capacity,
                    });
                }
                if !competitor.mark_hit(index as usize) {
                    log::warn!("Competitor {} hit target {} again", id, target);
                }
            }

            EventKind::LeftFiringRange => {
                lookup(&mut self.competitors, id)?.leave_range();
            }

            EventKind::EnterPenalty => {
                lookup(&mut self.competitors, id)?.enter_penalty(event.time);
            }

            EventKind::LeavePenalty => {
                let visit = lookup(&mut self.competitors, id)?.leave_penalty(event.time)?;
                log::trace!("Competitor {} penalty visit {}ms", id, visit.num_milliseconds());
            }

            EventKind::EndLap => {
                let laps = self.config.laps;
                let lap_len = f64::from(self.config.lap_len);
                let competitor = lookup(&mut self.competitors, id)?;

                if competitor.laps_completed() >= laps {
                    return Err(CompetitionError::ExcessLaps {
                        competitor: id,
                        laps,
                    });
                }
                let is_final = competitor.laps_completed() + 1 == laps;

                let lap = competitor.record_lap(event.time, lap_len);
                if lap <= Duration::zero() {
                    log::warn!("Competitor {} ended a lap of non-positive length", id);
                }

                if is_final {
                    let total = event.time.signed_duration_since(competitor.start_time());
                    settle(competitor, CompetitorStatus::Finished, total);
                }
            }

            EventKind::Abandon => {
                let competitor = lookup(&mut self.competitors, id)?;
                let total = event.time.signed_duration_since(competitor.start_time());
                settle(competitor, CompetitorStatus::NotFinished, total);
                log::debug!("Competitor {} can't continue: {}", id, event.extra());
            }
        }

        Ok(())
    }
}

/// Apply a status change unless the competitor already has a final outcome
///
/// A refused change is not an event failure: the earlier status and total
/// time stand and the rest of the log keeps replaying.
fn settle(competitor: &mut Competitor, to: CompetitorStatus, total: Duration) {
    if let Err(err) = competitor.transition(to, total) {
        log::warn!("{}; status unchanged", err);
    }
}

fn lookup(competitors: &mut BTreeMap<u32, Competitor>, id: u32) -> Result<&mut Competitor> {
    competitors
        .get_mut(&id)
        .ok_or(CompetitionError::NotRegistered(id))
}

/// Parse the extra parameter as a 1-based range or target number
fn parse_number(event: &RaceEvent) -> Result<u32> {
    event
        .extra()
        .trim()
        .parse()
        .map_err(|_| CompetitionError::NonNumericParameter {
            kind: event.kind,
            value: event.extra().to_string(),
        })
}
