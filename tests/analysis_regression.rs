//! Analysis Regression Tests
//!
//! Builds an in-memory field tool kit in the standard layout and runs it
//! through the public entry points. Also covers the total-failure paths:
//! nonexistent files, non-spreadsheet bytes, unrelated workbooks and the
//! parse deadline. No spreadsheet fixtures on disk are required.

use std::path::Path;
use std::time::Duration;

use drillout_analytics::{
    analyze_file, analyze_file_bounded, analyze_workbook, export, load_workbook_bounded,
    AnalysisConfig, AnalysisResult, CellValue, DataSource, ExtractionError, Grid, NoteKind,
    Severity, Workbook,
};

// ============================================================================
// Fixtures
// ============================================================================

fn text(s: &str) -> CellValue {
    CellValue::text(s)
}

fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

fn general_info() -> Grid {
    Grid::default()
        .with("B12", text("Customer Name:"))
        .with("C12", text("Permian Basin Services"))
        .with("D12", text("Ticket Number:"))
        .with("E12", text("AE867384"))
        .with("D13", text("Day Supervisor:"))
        .with("E13", text("R. Alvarez"))
        .with("B15", text("Date Started:"))
        .with("C15", text("2025-06-11"))
        .with("B16", text("Date Ended:"))
        .with("C16", text("2025-06-18"))
        .with("B21", text("Job Type:"))
        .with("C21", text("Plug Drillout"))
        .with("B23", text("Well #:"))
        .with("C23", text("Mesa 12-4H"))
        .with("D23", text("Lease:"))
        .with("E23", text("Mesa Unit"))
        .with("B24", text("County:"))
        .with("C24", text("Reeves"))
        .with("D24", text("Rig #:"))
        .with("E24", text("CTU-14"))
        .with("D25", text("AFE / PO:"))
        .with("E25", text("PO-55120"))
}

fn mill_data() -> Grid {
    let rows = [
        (1.0, "08:30", 5247.0, 40.0, 5250.0, 450.0, 1200.0),
        (2.0, "10:15", 5189.0, 44.0, 5192.0, 420.0, 1150.0),
        (3.0, "12:45", 5134.0, 38.0, 5136.0, 480.0, 1250.0),
    ];
    let mut grid = Grid::default()
        .with("A15", text("Plug #"))
        .with("C15", text("Tag Depth"))
        .with("D15", text("Drill Time"));
    for (i, (plug, time, tag, drill, actual, torque, pressure)) in rows.into_iter().enumerate() {
        let r = 16 + i;
        grid = grid
            .with(&format!("A{r}"), num(plug))
            .with(&format!("B{r}"), text(time))
            .with(&format!("C{r}"), num(tag))
            .with(&format!("D{r}"), num(drill))
            .with(&format!("E{r}"), num(actual))
            .with(&format!("G{r}"), num(torque))
            .with(&format!("H{r}"), num(pressure));
    }
    grid
}

fn ct_milling() -> Grid {
    Grid::default()
        .with("A10", text("Plug"))
        .with("A11", num(1.0))
        .with("B11", text("09:15"))
        .with("C11", num(4695.0))
        .with("D11", num(4693.0))
        .with("F11", num(32.0))
        .with("A12", num(2.0))
        .with("B12", text("11:45"))
        .with("C12", num(4640.0))
        .with("D12", num(4638.0))
        .with("F12", num(29.0))
}

fn day_sheet(date: &str, hours: Option<f64>, downtime: Option<f64>, log: &[&str]) -> Grid {
    let mut grid = Grid::default().with("A1", text("Date:")).with("B1", text(date));
    if let Some(h) = hours {
        grid = grid.with("A2", text("Work Hours:")).with("B2", num(h));
    }
    if let Some(d) = downtime {
        grid = grid.with("A3", text("Downtime:")).with("B3", num(d));
    }
    for (i, entry) in log.iter().enumerate() {
        grid = grid.with(&format!("A{}", 5 + i), text(entry));
    }
    grid
}

fn tool_sheet(tool_type: &str, deployed: &str, retrieved: &str, status: &str) -> Grid {
    Grid::default()
        .with("A5", text("Tool Type:"))
        .with("B5", text(tool_type))
        .with("A6", text("Deployment Time:"))
        .with("B6", text(deployed))
        .with("A7", text("Retrieval Time:"))
        .with("B7", text(retrieved))
        .with("A8", text("Status:"))
        .with("B8", text(status))
}

fn field_kit() -> Workbook {
    Workbook::from_sheets([
        ("General Info", general_info()),
        ("Mill Data", mill_data()),
        (" CT Milling", ct_milling()),
        (
            "SP1",
            day_sheet(
                "2025-06-11",
                Some(10.5),
                Some(1.0),
                &[
                    "06:00 Safety meeting and JSA",
                    "07:30 RIH with FT1",
                    "09:45 Milled plug 1",
                    "13:10 Milled plug 2",
                ],
            ),
        ),
        (
            "SP2",
            day_sheet(
                "2025-06-12",
                Some(12.0),
                Some(0.5),
                &[
                    "06:15 JSA",
                    "07:00 Pick up FT2 and FT3",
                    "08:20 Milling plug 3",
                    "11:40 CT op tag at 4693",
                    "14:05 CT op tag at 4638",
                    "16:30 POOH",
                ],
            ),
        ),
        ("SP3", day_sheet("2025-06-13", None, None, &["06:00 Rig down", "08:00 Release rig"])),
        ("FT1", tool_sheet("Junk Mill", "06:30", "09:00", "Successful")),
        ("FT2", tool_sheet("Overshot", "07:00", "11:30", "Worn - dressed and rerun")),
        ("FT3", tool_sheet("Taper Tap", "13:00", "14:30", "Recovered OK")),
    ])
}

fn seeded_config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.synthesis.seed = Some(2025);
    config
}

fn assert_all_keys(result: &AnalysisResult) {
    let value = serde_json::to_value(result).expect("serialize result");
    for key in AnalysisResult::KEYS {
        assert!(value.get(key).is_some(), "missing top-level key {key}");
    }
    assert!(value.get("data_source").is_some());
}

// ============================================================================
// Standard Layout
// ============================================================================

#[test]
fn standard_kit_extracts_job_and_sections() {
    let result = analyze_workbook(&field_kit(), &seeded_config());
    assert_eq!(result.data_source, DataSource::Extracted);
    assert_all_keys(&result);

    let job = &result.job_summary;
    assert_eq!(job.customer_name, "Permian Basin Services");
    assert_eq!(job.ticket_number, "AE867384");
    assert_eq!(job.lease, "Mesa Unit");
    assert_eq!(job.rig_name, "CTU-14");
    assert_eq!(job.duration_days, 8);

    assert_eq!(result.daily_breakdown.len(), 3);
    assert_eq!(result.equipment_usage.len(), 3);
    assert!(!result
        .extraction_notes
        .iter()
        .any(|n| n.kind == NoteKind::DemoFallback));
}

#[test]
fn standard_kit_metrics() {
    let result = analyze_workbook(&field_kit(), &seeded_config());

    let ops = result.operational_frequency.as_ref().expect("operational");
    assert_eq!(ops.total_activities, 12);
    assert!((ops.avg_activities_per_day - 4.0).abs() < 1e-9);
    assert_eq!(ops.peak_activity_day, 2);
    // Day 3 hours are estimated from its two activities
    assert!((ops.total_work_hours - 24.9).abs() < 1e-9);

    let mill = result.mill_performance.as_ref().expect("mill");
    assert_eq!(mill.total_plugs_drilled, 3);
    assert!((mill.avg_drill_time_mins - 40.7).abs() < 1e-9);
    assert!((mill.total_footage - 8.0).abs() < 1e-9);
    assert_eq!(mill.efficiency_rating, "High");
    assert_eq!(mill.synthesized_operations, 0);

    let ct = result.ct_performance.as_ref().expect("ct");
    assert_eq!(ct.total_ct_operations, 2);
    assert!((ct.avg_ct_drill_time - 30.5).abs() < 1e-9);
    assert!((ct.depth_accuracy - 100.0).abs() < 1e-9);

    let eq = result.equipment_frequency.as_ref().expect("equipment");
    assert_eq!(eq.tools_with_issues, 1);
    assert!((eq.deployment_success_rate - 66.67).abs() < 1e-9);
    assert_eq!(eq.tools_due_for_maintenance, vec!["FT2"]);

    let eff = result.efficiency_metrics.as_ref().expect("efficiency");
    assert!((eff.drilling_efficiency - 92.0).abs() < f64::EPSILON);
    assert!((eff.equipment_utilization - 20.0).abs() < 1e-9);
}

#[test]
fn standard_kit_recommendation_order() {
    let result = analyze_workbook(&field_kit(), &seeded_config());
    let severities: Vec<Severity> = result.recommendations.iter().map(|r| r.severity).collect();
    assert_eq!(
        severities,
        vec![
            Severity::Positive,
            Severity::Efficiency,
            Severity::Warning,
            Severity::Efficiency,
            Severity::Warning,
            Severity::Safety,
        ]
    );
    let messages = result.recommendation_messages();
    assert!(messages[2].starts_with("1 tool (FT2) requires maintenance"));
    assert!(messages[5].contains("safety"));
}

#[test]
fn seeded_extraction_is_idempotent() {
    let config = seeded_config();
    let sparse = Workbook::from_sheets([
        ("General Info", general_info()),
        ("Mill Data", Grid::default()),
        ("CT Milling", Grid::default()),
        ("SP1", day_sheet("2025-06-11", None, None, &["06:00 JSA"])),
    ]);
    let first = analyze_workbook(&sparse, &config);
    let second = analyze_workbook(&sparse, &config);
    assert_eq!(first, second);

    let mill = first.mill_performance.as_ref().expect("mill");
    assert_eq!(mill.total_plugs_drilled, 10);
    assert_eq!(mill.synthesized_operations, 10);
}

#[test]
fn json_round_trip_preserves_result() {
    let result = analyze_workbook(&field_kit(), &seeded_config());
    let json = export::to_json(&result).expect("encode");
    let back = export::from_json(&json).expect("decode");
    assert_eq!(back, result);

    let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
    assert!(value["recommendations"][0].is_string());
    assert_eq!(value["recommendation_severities"][0], serde_json::json!("positive"));
}

// ============================================================================
// Failure Paths
// ============================================================================

#[test]
fn nonexistent_file_returns_complete_demo() {
    let result = analyze_file(Path::new("/nonexistent/field_kit.xlsx"), &AnalysisConfig::default());
    assert!(result.is_demo());
    assert_all_keys(&result);
    assert_eq!(result.extraction_notes.len(), 1);
    assert_eq!(result.extraction_notes[0].kind, NoteKind::DemoFallback);
}

#[test]
fn garbage_bytes_return_complete_demo() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("field_kit.xlsx");
    std::fs::write(&path, b"PK\x03\x04 definitely not a workbook").expect("write");

    let result = analyze_file(&path, &AnalysisConfig::default());
    assert!(result.is_demo());
    assert_all_keys(&result);
}

#[test]
fn unrelated_workbook_returns_demo() {
    let wb = Workbook::from_sheets([("Budget", Grid::from_strings([vec!["Q1", "Q2"]]))]);
    let result = analyze_workbook(&wb, &AnalysisConfig::default());
    assert!(result.is_demo());
    assert_all_keys(&result);
}

#[test]
fn missing_sections_use_defaults_without_demo_tag() {
    let wb = Workbook::from_sheets([("General Info", general_info())]);
    let result = analyze_workbook(&wb, &AnalysisConfig::default());
    assert_eq!(result.data_source, DataSource::Extracted);
    assert_all_keys(&result);
    assert_eq!(result.job_summary.ticket_number, "AE867384");
    let missing = result
        .extraction_notes
        .iter()
        .filter(|n| n.kind == NoteKind::MissingSheet)
        .count();
    // Mill, CT, day sheets and tool sheets
    assert_eq!(missing, 4);
}

// ============================================================================
// Parse Deadline
// ============================================================================

#[tokio::test]
async fn slow_loader_hits_deadline() {
    let limit = Duration::from_millis(25);
    let result = load_workbook_bounded(
        || {
            std::thread::sleep(Duration::from_millis(400));
            Ok(field_kit())
        },
        limit,
    )
    .await;
    assert!(matches!(result, Err(ExtractionError::Timeout(d)) if d == limit));
}

#[tokio::test]
async fn bounded_analysis_of_missing_file_returns_demo() {
    let result =
        analyze_file_bounded(Path::new("/nonexistent/field_kit.xlsx"), &AnalysisConfig::default()).await;
    assert!(result.is_demo());
    assert_all_keys(&result);
}
