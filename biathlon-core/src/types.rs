//! Core types for the biathlon competition library
//!
//! This module defines the fundamental types shared by the state machine,
//! the line parser and the report generator: timestamps and durations,
//! event kinds and records, competitor status, and the error type.

use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute time of day, millisecond precision
pub type Timestamp = NaiveTime;

/// Signed elapsed time between two timestamps
pub type Duration = TimeDelta;

/// Result type for competition operations
pub type Result<T> = std::result::Result<T, CompetitionError>;

/// Number of targets on every firing line
pub const TARGETS_PER_FIRING_LINE: usize = 5;

/// Errors that can occur while applying events or producing the report
#[derive(Debug, thiserror::Error)]
pub enum CompetitionError {
    #[error("Malformed time of day: {0:?} (expected HH:MM:SS.mmm)")]
    MalformedTime(String),

    #[error("Malformed duration: {0:?} (expected HH:MM:SS)")]
    MalformedDuration(String),

    #[error("Non-numeric parameter for {kind}: {value:?}")]
    NonNumericParameter { kind: EventKind, value: String },

    #[error("Invalid target for competitor {competitor}: index {index} of {capacity}")]
    InvalidTarget {
        competitor: u32,
        index: i64,
        capacity: usize,
    },

    #[error("Invalid firing range {range} for competitor {competitor} (of {firing_lines})")]
    InvalidFiringRange {
        competitor: u32,
        range: u32,
        firing_lines: u32,
    },

    #[error("Competitor {competitor} ended more laps than the configured {laps}")]
    ExcessLaps { competitor: u32, laps: u32 },

    #[error("Competitor {0} is not registered")]
    NotRegistered(u32),

    #[error("Competitor {0} is already registered")]
    AlreadyRegistered(u32),

    #[error("Competitor {competitor} is {current}, cannot become {attempted}")]
    StatusLocked {
        competitor: u32,
        current: CompetitorStatus,
        attempted: CompetitorStatus,
    },

    #[error("Competitor {0} left the penalty laps without entering them")]
    PenaltyNotEntered(u32),

    #[error("Malformed event line: {0}")]
    MalformedLine(String),

    #[error("Unknown event id: {0}")]
    UnknownEvent(u32),

    #[error("Invalid race configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to write report: {0}")]
    WriteFailure(#[from] std::io::Error),
}

/// The eleven kinds of race event, numbered as they appear in event logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Register,
    SetScheduledStart,
    OnStartLine,
    ActualStart,
    OnFiringRange,
    TargetHit,
    LeftFiringRange,
    EnterPenalty,
    LeavePenalty,
    EndLap,
    Abandon,
}

impl EventKind {
    /// Numeric event id used in event logs (1-based)
    pub fn id(self) -> u32 {
        match self {
            EventKind::Register => 1,
            EventKind::SetScheduledStart => 2,
            EventKind::OnStartLine => 3,
            EventKind::ActualStart => 4,
            EventKind::OnFiringRange => 5,
            EventKind::TargetHit => 6,
            EventKind::LeftFiringRange => 7,
            EventKind::EnterPenalty => 8,
            EventKind::LeavePenalty => 9,
            EventKind::EndLap => 10,
            EventKind::Abandon => 11,
        }
    }
}

impl TryFrom<u32> for EventKind {
    type Error = CompetitionError;

    fn try_from(id: u32) -> Result<Self> {
        let kind = match id {
            1 => EventKind::Register,
            2 => EventKind::SetScheduledStart,
            3 => EventKind::OnStartLine,
            4 => EventKind::ActualStart,
            5 => EventKind::OnFiringRange,
            6 => EventKind::TargetHit,
            7 => EventKind::LeftFiringRange,
            8 => EventKind::EnterPenalty,
            9 => EventKind::LeavePenalty,
            10 => EventKind::EndLap,
            11 => EventKind::Abandon,
            other => return Err(CompetitionError::UnknownEvent(other)),
        };
        Ok(kind)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Register => "Register",
            EventKind::SetScheduledStart => "SetScheduledStart",
            EventKind::OnStartLine => "OnStartLine",
            EventKind::ActualStart => "ActualStart",
            EventKind::OnFiringRange => "OnFiringRange",
            EventKind::TargetHit => "TargetHit",
            EventKind::LeftFiringRange => "LeftFiringRange",
            EventKind::EnterPenalty => "EnterPenalty",
            EventKind::LeavePenalty => "LeavePenalty",
            EventKind::EndLap => "EndLap",
            EventKind::Abandon => "Abandon",
        };
        write!(f, "{}({})", name, self.id())
    }
}

/// One discrete race occurrence for one competitor
#[derive(Debug, Clone, PartialEq)]
pub struct RaceEvent {
    /// What happened
    pub kind: EventKind,
    /// Competitor the event is addressed to
    pub competitor_id: u32,
    /// Time of day the event occurred
    pub time: Timestamp,
    /// Free-form parameter: a time string, a range/target number, or a reason
    pub extra: Option<String>,
}

impl RaceEvent {
    /// Create an event without an extra parameter
    pub fn new(kind: EventKind, competitor_id: u32, time: Timestamp) -> Self {
        Self {
            kind,
            competitor_id,
            time,
            extra: None,
        }
    }

    /// Builder method: attach the extra parameter
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Extra parameter, or an empty string when absent
    pub fn extra(&self) -> &str {
        self.extra.as_deref().unwrap_or("")
    }
}

/// Competitor race status
///
/// `Racing` is the implicit state of every registered competitor; the three
/// other states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompetitorStatus {
    #[default]
    Racing,
    NotStarted,
    NotFinished,
    Finished,
}

impl CompetitorStatus {
    /// True once a final outcome has been recorded
    pub fn is_terminal(self) -> bool {
        !matches!(self, CompetitorStatus::Racing)
    }
}

impl fmt::Display for CompetitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompetitorStatus::Racing => write!(f, "Racing"),
            CompetitorStatus::NotStarted => write!(f, "NotStarted"),
            CompetitorStatus::NotFinished => write!(f, "NotFinished"),
            CompetitorStatus::Finished => write!(f, "Finished"),
        }
    }
}
