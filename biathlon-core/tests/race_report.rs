// End-to-end: event log lines in, report lines out
use biathlon_core::narrative::describe;
use biathlon_core::{
    parse_event_line, report_lines, Competition, CompetitionError, CompetitorStatus, RaceConfig,
};

fn sprint_config() -> RaceConfig {
    RaceConfig::new()
        .with_laps(2)
        .with_lap_len(3651)
        .with_penalty_len(50)
        .with_firing_lines(1)
        .with_start("09:30:00.000")
        .with_start_delta("00:00:30")
}

fn run(config: RaceConfig, log: &str) -> Result<Competition, CompetitionError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut competition = Competition::new(config)?;
    for line in log.lines().filter(|l| !l.trim().is_empty()) {
        let event = parse_event_line(line)?;
        competition.apply_event(&event)?;
    }
    Ok(competition)
}

const SINGLE_COMPETITOR: &str = "
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

#[test]
fn test_single_competitor_not_finished() {
    let competition = run(sprint_config(), SINGLE_COMPETITOR).unwrap();

    let c = competition.competitor(1).unwrap();
    assert_eq!(c.status(), CompetitorStatus::NotFinished);
    assert_eq!(c.ranges_visited(), 1);

    assert_eq!(
        report_lines(&competition.report()),
        vec!["[NotFinished] 1 [{00:29:03.872, 2.093}, {,}] {00:01:52.476, 0.444} 4/5"]
    );
}

#[test]
fn test_mixed_field_ordering() {
    let log = format!(
        "{}{}",
        SINGLE_COMPETITOR,
        "
[09:06:00.000] 1 2
[09:06:00.000] 1 3
[09:15:01.000] 2 2 09:31:00.000
[09:15:02.000] 2 3 09:32:00.000
[09:31:05.000] 4 2
[09:33:00.000] 4 3
[09:50:00.000] 5 2 1
[09:50:01.000] 6 2 1
[09:50:02.000] 6 2 2
[09:50:03.000] 6 2 3
[09:50:04.000] 6 2 4
[09:50:05.000] 6 2 5
[09:50:06.000] 7 2
[10:00:00.000] 10 2
[10:29:00.000] 10 2
"
    );

    let competition = run(sprint_config(), &log).unwrap();
    assert_eq!(competition.len(), 3);
    assert_eq!(
        competition.competitor(3).unwrap().status(),
        CompetitorStatus::NotStarted
    );

    assert_eq!(
        report_lines(&competition.report()),
        vec![
            "[NotStarted] 3 [{,}, {,}] {,} 0/0",
            "[NotFinished] 1 [{00:29:03.872, 2.093}, {,}] {00:01:52.476, 0.444} 4/5",
            "[00:58:00.000] 2 [{00:29:00.000, 2.098}, {00:29:00.000, 2.098}] {,} 5/5",
        ]
    );
}

#[test]
fn test_late_starter_running_laps_keeps_standings() {
    let log = "
[09:05:59.867] 1 1
[09:06:00.000] 1 2
[09:15:00.841] 2 1 09:30:00.000
[09:15:01.000] 2 2 09:31:00.000
[09:30:31.000] 4 1
[09:31:10.000] 4 2
[09:59:31.000] 10 1
[10:00:00.000] 10 2
[10:29:00.000] 10 2
[10:29:31.000] 10 1
";
    let competition = run(sprint_config(), log).unwrap();

    let late = competition.competitor(1).unwrap();
    assert_eq!(late.status(), CompetitorStatus::NotStarted);
    assert_eq!(late.laps_completed(), 2);

    assert_eq!(
        report_lines(&competition.report()),
        vec![
            "[NotStarted] 1 [{00:29:31.000, 2.061}, {00:30:00.000, 2.028}] {,} 0/0",
            "[00:58:00.000] 2 [{00:29:00.000, 2.098}, {00:29:00.000, 2.098}] {,} 0/0",
        ]
    );
}

#[test]
fn test_run_stops_at_first_error() {
    let log = "
[09:05:59.867] 1 1
[09:15:00.841] 2 1 09:30:00.000
[09:40:00.000] 10 1
[09:50:00.000] 10 1
[10:00:00.000] 10 1
";
    let err = run(sprint_config(), log).err().unwrap();
    assert!(matches!(
        err,
        CompetitionError::ExcessLaps {
            competitor: 1,
            laps: 2
        }
    ));
}

#[test]
fn test_unregistered_reference_fails() {
    let err = run(sprint_config(), "[09:05:59.867] 3 42").err().unwrap();
    assert!(matches!(err, CompetitionError::NotRegistered(42)));
}

#[test]
fn test_narrative_for_every_line() {
    let described: Vec<String> = SINGLE_COMPETITOR
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| describe(&parse_event_line(l).unwrap()))
        .collect();

    assert_eq!(described.len(), 14);
    assert_eq!(described[0], "[09:05:59.867] The competitor(1) registered");
    assert_eq!(
        described[7],
        "[09:49:35.937] The target(4) has been hit by competitor(1)"
    );
    assert_eq!(
        described[13],
        "[09:59:03.872] The competitor(1) can`t continue: Lost in the forest"
    );
}
