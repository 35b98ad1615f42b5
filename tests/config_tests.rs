//! Config Loading Tests
//!
//! Exercises TOML loading, validation and the effect of config values on a
//! full analysis run.

use drillout_analytics::config::{ConfigError, EquipmentThresholds};
use drillout_analytics::{analyze_workbook, demo, AnalysisConfig, CellValue, Grid, Workbook};

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("drillout_config.toml");
    std::fs::write(&path, contents).expect("write config");
    (dir, path)
}

#[test]
fn fishing_profile_from_toml() {
    let (_dir, path) = write_config(
        r#"
[equipment]
excellent_success_rate = 90.0
good_success_rate = 70.0
"#,
    );
    let config = AnalysisConfig::load_from_file(&path).expect("load");
    assert_eq!(config.equipment, EquipmentThresholds::fishing());
    assert_eq!(config.workbook, AnalysisConfig::default().workbook);
}

#[test]
fn invalid_values_are_all_reported() {
    let (_dir, path) = write_config(
        r#"
[equipment]
excellent_success_rate = 60.0
good_success_rate = 80.0

[activity]
min_activities = 9
max_activities = 3
"#,
    );
    match AnalysisConfig::load_from_file(&path) {
        Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2, "{errors:?}"),
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let (_dir, path) = write_config("[workbook\nday_sheet_count = ");
    assert!(matches!(
        AnalysisConfig::load_from_file(&path),
        Err(ConfigError::Parse(..))
    ));
}

#[test]
fn custom_sheet_names_drive_extraction() {
    let (_dir, path) = write_config(
        r#"
[workbook]
general_info_sheet = "Job"
day_sheet_prefix = "Day "
day_sheet_count = 2
"#,
    );
    let config = AnalysisConfig::load_from_file(&path).expect("load");

    let wb = Workbook::from_sheets([
        (
            "Job",
            Grid::default()
                .with("D12", CellValue::text("Ticket Number:"))
                .with("E12", CellValue::text("YJ-2231")),
        ),
        (
            "Day 1",
            Grid::from_strings([vec!["06:00 JSA"], vec!["07:00 RIH"], vec!["09:30 POOH"]]),
        ),
    ]);
    let result = analyze_workbook(&wb, &config);
    assert!(!result.is_demo());
    assert_eq!(result.job_summary.ticket_number, "YJ-2231");
    assert_eq!(result.daily_breakdown.len(), 1);
    assert_eq!(result.daily_breakdown[0].activities, 3);
}

#[test]
fn recommendation_thresholds_follow_config() {
    let mut config = AnalysisConfig::default();
    config.recommendations.efficiency_share_threshold = 95.0;
    config.recommendations.downtime_warning_percent = 50.0;

    let result = demo::analysis(&config);
    let messages = result.recommendation_messages();
    assert!(!messages.iter().any(|m| m.contains("sharing best practices")));
    assert!(!messages.iter().any(|m| m.contains("Downtime")));
}

#[test]
fn config_round_trips_through_toml() {
    let mut config = AnalysisConfig::default();
    config.synthesis.seed = Some(99);
    config.equipment = EquipmentThresholds::fishing();
    let text = config.to_toml().expect("toml");
    let (_dir, path) = write_config(&text);
    assert_eq!(AnalysisConfig::load_from_file(&path).expect("load"), config);
}
