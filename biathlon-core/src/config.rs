//! Race configuration types
//!
//! This module defines the numeric race parameters the state machine and the
//! report generator read. Loading them from disk is the application's job;
//! the field names follow the `config.json` layout race organisers publish.

use crate::timing::{parse_clock_duration, parse_time_of_day};
use crate::types::{CompetitionError, Duration, Result, Timestamp, TARGETS_PER_FIRING_LINE};
use serde::{Deserialize, Serialize};

/// Configuration for one race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfig {
    /// Number of main laps (at least 1)
    #[serde(default = "default_laps")]
    pub laps: u32,

    /// Length of one main lap in meters
    #[serde(default = "default_lap_len")]
    pub lap_len: u32,

    /// Length of one penalty lap in meters
    #[serde(default = "default_penalty_len")]
    pub penalty_len: u32,

    /// Number of firing lines on the course (at least 1)
    #[serde(default = "default_firing_lines")]
    pub firing_lines: u32,

    /// Planned race start, `HH:MM:SS.mmm`
    #[serde(default = "default_start")]
    pub start: String,

    /// Allowed gap between scheduled and actual start, `HH:MM:SS`
    #[serde(default = "default_start_delta")]
    pub start_delta: String,
}

fn default_laps() -> u32 {
    2
}

fn default_lap_len() -> u32 {
    3500
}

fn default_penalty_len() -> u32 {
    150
}

fn default_firing_lines() -> u32 {
    2
}

fn default_start() -> String {
    "10:00:00.000".to_string()
}

fn default_start_delta() -> String {
    "00:01:30".to_string()
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            laps: default_laps(),
            lap_len: default_lap_len(),
            penalty_len: default_penalty_len(),
            firing_lines: default_firing_lines(),
            start: default_start(),
            start_delta: default_start_delta(),
        }
    }
}

impl RaceConfig {
    /// Create a race configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the number of main laps
    pub fn with_laps(mut self, laps: u32) -> Self {
        self.laps = laps;
        self
    }

    /// Builder method: set the main lap length in meters
    pub fn with_lap_len(mut self, meters: u32) -> Self {
        self.lap_len = meters;
        self
    }

    /// Builder method: set the penalty lap length in meters
    pub fn with_penalty_len(mut self, meters: u32) -> Self {
        self.penalty_len = meters;
        self
    }

    /// Builder method: set the number of firing lines
    pub fn with_firing_lines(mut self, firing_lines: u32) -> Self {
        self.firing_lines = firing_lines;
        self
    }

    /// Builder method: set the planned race start
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = start.into();
        self
    }

    /// Builder method: set the start window
    pub fn with_start_delta(mut self, start_delta: impl Into<String>) -> Self {
        self.start_delta = start_delta.into();
        self
    }

    /// Planned race start as a time of day
    pub fn scheduled_start(&self) -> Result<Timestamp> {
        parse_time_of_day(&self.start)
    }

    /// Allowed gap between scheduled and actual start
    pub fn start_window(&self) -> Result<Duration> {
        parse_clock_duration(&self.start_delta)
    }

    /// Size of every competitor's hit mask
    pub fn target_count(&self) -> usize {
        TARGETS_PER_FIRING_LINE * self.firing_lines as usize
    }

    /// Check that the configuration describes a runnable race
    pub fn validate(&self) -> Result<()> {
        if self.laps == 0 {
            return Err(CompetitionError::InvalidConfig(
                "laps must be at least 1".to_string(),
            ));
        }
        if self.firing_lines == 0 {
            return Err(CompetitionError::InvalidConfig(
                "firingLines must be at least 1".to_string(),
            ));
        }
        self.scheduled_start()?;
        self.start_window()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_race_config_builder() {
        let config = RaceConfig::new()
            .with_laps(1)
            .with_lap_len(1000)
            .with_penalty_len(50)
            .with_firing_lines(3)
            .with_start("12:00:00.000")
            .with_start_delta("00:03:00");

        assert_eq!(config.laps, 1);
        assert_eq!(config.lap_len, 1000);
        assert_eq!(config.penalty_len, 50);
        assert_eq!(config.target_count(), 15);
        assert_eq!(config.start_window().unwrap(), Duration::minutes(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_race_config_defaults() {
        let config: RaceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RaceConfig::default());
        assert_eq!(config.laps, 2);
        assert_eq!(config.start_window().unwrap(), Duration::seconds(90));
    }

    #[test]
    fn test_race_config_camel_case() {
        let json = r#"{
            "laps": 2,
            "lapLen": 3651,
            "penaltyLen": 50,
            "firingLines": 1,
            "start": "09:30:00.000",
            "startDelta": "00:00:30"
        }"#;

        let config: RaceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.lap_len, 3651);
        assert_eq!(config.penalty_len, 50);
        assert_eq!(config.firing_lines, 1);
        assert_eq!(config.start_delta, "00:00:30");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            RaceConfig::new().with_laps(0).validate(),
            Err(CompetitionError::InvalidConfig(_))
        ));
        assert!(matches!(
            RaceConfig::new().with_firing_lines(0).validate(),
            Err(CompetitionError::InvalidConfig(_))
        ));
        assert!(matches!(
            RaceConfig::new().with_start("10:00").validate(),
            Err(CompetitionError::MalformedTime(_))
        ));
        assert!(matches!(
            RaceConfig::new().with_start_delta("1:30").validate(),
            Err(CompetitionError::MalformedDuration(_))
        ));
    }
}
