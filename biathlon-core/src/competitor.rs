//! Per-competitor accumulated race state
//!
//! A `Competitor` is created on registration and mutated by every later
//! event addressed to it. Status changes go through [`Competitor::transition`],
//! which refuses to leave a terminal status.

use crate::report::format::average_speed;
use crate::types::{CompetitionError, CompetitorStatus, Duration, Result, Timestamp};

/// Accumulated race statistics for one competitor
#[derive(Debug, Clone, PartialEq)]
pub struct Competitor {
    id: u32,
    status: CompetitorStatus,
    start_time: Timestamp,
    last_split: Timestamp,
    total_time: Duration,
    lap_times: Vec<Duration>,
    lap_speeds: Vec<f64>,
    penalty_time: Duration,
    current_range: usize,
    ranges_visited: u32,
    hits: Box<[bool]>,
    penalty_entered_at: Option<Timestamp>,
    laps_completed: u32,
}

impl Competitor {
    /// Create a freshly registered competitor
    ///
    /// # Arguments
    /// * `id` - Competitor identifier from the event log
    /// * `origin` - Initial start and split origin (the race start)
    /// * `laps` - Configured lap count, used to pre-size lap storage
    /// * `targets` - Hit mask capacity (5 per firing line)
    pub fn new(id: u32, origin: Timestamp, laps: u32, targets: usize) -> Self {
        Self {
            id,
            status: CompetitorStatus::Racing,
            start_time: origin,
            last_split: origin,
            total_time: Duration::zero(),
            lap_times: Vec::with_capacity(laps as usize),
            lap_speeds: Vec::with_capacity(laps as usize),
            penalty_time: Duration::zero(),
            current_range: 0,
            ranges_visited: 0,
            hits: vec![false; targets].into_boxed_slice(),
            penalty_entered_at: None,
            laps_completed: 0,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn status(&self) -> CompetitorStatus {
        self.status
    }

    /// Lap-timing origin: the drawn (scheduled) start time
    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// Origin of the lap currently being run
    pub fn last_split(&self) -> Timestamp {
        self.last_split
    }

    /// Meaning depends on status: race time when Finished, the start window
    /// when NotStarted, time until abandonment when NotFinished
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    pub fn lap_times(&self) -> &[Duration] {
        &self.lap_times
    }

    pub fn lap_speeds(&self) -> &[f64] {
        &self.lap_speeds
    }

    /// Sum of all penalty lap visits
    pub fn penalty_time(&self) -> Duration {
        self.penalty_time
    }

    /// 0-based index of the firing range the competitor last entered
    pub fn current_range(&self) -> usize {
        self.current_range
    }

    pub fn ranges_visited(&self) -> u32 {
        self.ranges_visited
    }

    pub fn hits(&self) -> &[bool] {
        &self.hits
    }

    pub fn laps_completed(&self) -> u32 {
        self.laps_completed
    }

    /// Number of distinct targets hit
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|&&hit| hit).count()
    }

    /// Total shots fired: 5 per firing range visited
    pub fn shots(&self) -> usize {
        crate::types::TARGETS_PER_FIRING_LINE * self.ranges_visited as usize
    }

    /// Move to a terminal status and record the matching total time
    ///
    /// The only place `status` changes. A competitor that already has a
    /// final outcome keeps it and the call fails with `StatusLocked`.
    pub fn transition(&mut self, to: CompetitorStatus, total_time: Duration) -> Result<()> {
        if self.status.is_terminal() {
            return Err(CompetitionError::StatusLocked {
                competitor: self.id,
                current: self.status,
                attempted: to,
            });
        }
        log::info!("Competitor {} is now {}", self.id, to);
        self.status = to;
        self.total_time = total_time;
        Ok(())
    }

    pub(crate) fn set_start(&mut self, start: Timestamp) {
        self.start_time = start;
        self.last_split = start;
    }

    pub(crate) fn enter_range(&mut self, index: usize) {
        self.current_range = index;
    }

    pub(crate) fn leave_range(&mut self) {
        self.ranges_visited += 1;
    }

    /// Mark a target as hit; returns false if it was already hit
    pub(crate) fn mark_hit(&mut self, index: usize) -> bool {
        !std::mem::replace(&mut self.hits[index], true)
    }

    pub(crate) fn enter_penalty(&mut self, at: Timestamp) {
        self.penalty_entered_at = Some(at);
    }

    /// Close the pending penalty visit and return its duration
    pub(crate) fn leave_penalty(&mut self, at: Timestamp) -> Result<Duration> {
        let entered = self
            .penalty_entered_at
            .take()
            .ok_or(CompetitionError::PenaltyNotEntered(self.id))?;
        let visit = at.signed_duration_since(entered);
        self.penalty_time = self.penalty_time + visit;
        Ok(visit)
    }

    /// Append a completed lap ending at `at` and move the split origin there
    pub(crate) fn record_lap(&mut self, at: Timestamp, lap_len: f64) -> Duration {
        let lap = at.signed_duration_since(self.last_split);
        self.lap_times.push(lap);
        self.lap_speeds.push(average_speed(lap, lap_len));
        self.last_split = at;
        self.laps_completed += 1;
        lap
    }
}
