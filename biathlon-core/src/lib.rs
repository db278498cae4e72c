//! Biathlon Competition Library
//!
//! Folds a chronological log of race events into per-competitor statistics
//! and renders the final standings report.
//!
//! # Architecture
//!
//! - [`parser`] turns an event log line into a [`RaceEvent`]
//! - [`Competition`] owns every [`Competitor`] and applies events in order
//! - [`report`] sorts competitors by total time and formats report lines
//! - [`timing`] is the `HH:MM:SS.mmm` / `HH:MM:SS` codec used throughout
//! - [`narrative`] renders the human-readable description of an event
//!
//! The library does NOT read files, load configuration from disk or decide
//! where output goes. That lives in the application layer (biathlon-cli).
//!
//! # Example Usage
//!
//! ```
//! use biathlon_core::{parse_event_line, report_lines, Competition, RaceConfig};
//!
//! let config = RaceConfig::new()
//!     .with_laps(1)
//!     .with_lap_len(1000)
//!     .with_start_delta("00:03:00");
//! let mut competition = Competition::new(config).unwrap();
//!
//! for line in [
//!     "[12:00:00.000] 1 100",
//!     "[12:00:00.000] 2 100 12:01:00.000",
//!     "[12:03:00.000] 4 100",
//!     "[12:08:00.000] 10 100",
//! ] {
//!     let event = parse_event_line(line).unwrap();
//!     competition.apply_event(&event).unwrap();
//! }
//!
//! let lines = report_lines(&competition.report());
//! assert_eq!(lines, vec!["[00:07:00.000] 100 [{00:07:00.000, 2.380}] {,} 0/0"]);
//! ```

// Public modules
pub mod competition;
pub mod competitor;
pub mod config;
pub mod narrative;
pub mod parser;
pub mod report;
pub mod timing;
pub mod types;

// Re-export main types for convenience
pub use competition::Competition;
pub use competitor::Competitor;
pub use config::RaceConfig;
pub use parser::parse_event_line;
pub use report::{generate_report, report_lines, write_report, LapSummary, ReportRow};
pub use types::{
    CompetitionError, CompetitorStatus, Duration, EventKind, RaceEvent, Result, Timestamp,
    TARGETS_PER_FIRING_LINE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
