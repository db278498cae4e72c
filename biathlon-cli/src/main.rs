//! Biathlon Report CLI Application
//!
//! Command-line front end for the biathlon-core library. It:
//! - Loads the race configuration (TOML or JSON)
//! - Replays an event log line by line, stopping at the first bad event
//! - Writes the human-readable event narrative
//! - Writes the final standings report (TXT or JSON)

use anyhow::{Context, Result};
use biathlon_core::narrative::describe;
use biathlon_core::{parse_event_line, write_report, Competition, ReportRow};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

mod config;

use config::{AppConfig, OutputFormat};

/// Biathlon Report - Turn a race event log into final standings
#[derive(Parser, Debug)]
#[command(name = "biathlon-cli")]
#[command(about = "Build biathlon standings from a race event log", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the event log to replay
    #[arg(short, long, value_name = "FILE")]
    events: Option<PathBuf>,

    /// Path to configuration file (config.toml or config.json)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file for the final report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output file for the event narrative (default: the logger)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Command-line flags win over configuration file values
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(events) = &self.events {
            config.input.events = Some(events.clone());
        }
        if let Some(output) = &self.output {
            config.output.report = Some(output.clone());
        }
        if let Some(log_file) = &self.log_file {
            config.output.log_file = Some(log_file.clone());
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Biathlon Report CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using competition library v{}", biathlon_core::VERSION);

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => {
            log::debug!("No configuration file given, using defaults");
            AppConfig::default()
        }
    };
    args.apply_overrides(&mut config);

    let events_path = config
        .input
        .events
        .clone()
        .context("No event log given (use --events or [input] events)")?;

    let rows = process_events(&config, &events_path)?;
    log::info!("Race processed: {} competitors", rows.len());

    match &config.output.report {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {:?}", path))?;
            write_output(&mut BufWriter::new(file), &rows, config.output.format)?;
            log::info!("Report written to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            write_output(&mut stdout.lock(), &rows, config.output.format)?;
        }
    }

    Ok(())
}

/// Replay the event log and return the final standings
fn process_events(config: &AppConfig, events_path: &Path) -> Result<Vec<ReportRow>> {
    let mut competition = Competition::new(config.race.clone())
        .context("Invalid race configuration")?;

    let file = File::open(events_path)
        .with_context(|| format!("Failed to open event log: {:?}", events_path))?;

    let mut narrative = match &config.output.log_file {
        Some(path) => Some(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create narrative log: {:?}", path)
        })?)),
        None => None,
    };

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read {:?}", events_path))?;
        if line.trim().is_empty() {
            continue;
        }

        let event = parse_event_line(&line)
            .with_context(|| format!("{}:{}: cannot parse event", events_path.display(), line_no))?;

        let message = describe(&event);
        match narrative.as_mut() {
            Some(out) => writeln!(out, "{}", message)?,
            None => log::info!("{}", message),
        }

        competition.apply_event(&event).with_context(|| {
            format!("{}:{}: cannot apply event", events_path.display(), line_no)
        })?;
    }

    if let Some(out) = narrative.as_mut() {
        out.flush()?;
    }

    Ok(competition.report())
}

/// Write the report in the requested format
fn write_output<W: Write>(writer: &mut W, rows: &[ReportRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Txt => write_report(writer, rows)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, rows)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use biathlon_core::RaceConfig;

    const EVENTS: &str = "\
[09:05:59.867] 1 1
[09:15:00.841] 2 1 09:30:00.000
[09:29:45.734] 3 1
[09:30:01.005] 4 1

[09:49:31.659] 5 1 1
[09:49:33.123] 6 1 1
[09:49:34.650] 6 1 2
[09:49:35.937] 6 1 4
[09:49:37.364] 6 1 5
[09:49:38.339] 7 1
[09:49:55.915] 8 1
[09:51:48.391] 9 1
[09:59:03.872] 10 1
[09:59:03.872] 11 1 Lost in the forest
";

    fn sprint() -> AppConfig {
        AppConfig {
            race: RaceConfig::new()
                .with_laps(2)
                .with_lap_len(3651)
                .with_penalty_len(50)
                .with_firing_lines(1)
                .with_start("09:30:00.000")
                .with_start_delta("00:00:30"),
            ..AppConfig::default()
        }
    }

    fn events_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_process_events_txt() {
        let events = events_file(EVENTS);
        let rows = process_events(&sprint(), events.path()).unwrap();

        let mut out = Vec::new();
        write_output(&mut out, &rows, OutputFormat::Txt).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[NotFinished] 1 [{00:29:03.872, 2.093}, {,}] {00:01:52.476, 0.444} 4/5\n"
        );
    }

    #[test]
    fn test_process_events_json() {
        let events = events_file(EVENTS);
        let rows = process_events(&sprint(), events.path()).unwrap();

        let mut out = Vec::new();
        write_output(&mut out, &rows, OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["status"], "NotFinished");
        assert_eq!(json[0]["penalty"]["time"], "00:01:52.476");
        assert_eq!(json[0]["hits"], 4);
        assert_eq!(json[0]["shots"], 5);
    }

    #[test]
    fn test_narrative_log_file() {
        let events = events_file(EVENTS);
        let narrative = tempfile::NamedTempFile::new().unwrap();
        let mut config = sprint();
        config.output.log_file = Some(narrative.path().to_path_buf());

        process_events(&config, events.path()).unwrap();

        let written = std::fs::read_to_string(narrative.path()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "[09:05:59.867] The competitor(1) registered");
        assert_eq!(
            lines[1],
            "[09:15:00.841] The start time for the competitor(1) was set by a draw to 09:30:00.000"
        );
    }

    #[test]
    fn test_error_names_line() {
        let events = events_file("[09:05:59.867] 1 1\n[09:06:00.000] 6 1 nine\n");
        let err = process_events(&sprint(), events.path()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains(":2: cannot apply event"), "{}", message);
        assert!(message.contains("Non-numeric parameter"), "{}", message);
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "biathlon-cli",
            "--events",
            "events.log",
            "--format",
            "json",
        ]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.input.events, Some(PathBuf::from("events.log")));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.report.is_none());
    }
}
