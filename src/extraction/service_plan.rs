//! Daily operations extraction (`SP1`..`SP10` service-plan sheets)
//!
//! Day sheets are free-form activity logs. The activity count is the number
//! of time-of-day stamps (`8:30`, `14:20`) anywhere on the sheet, clamped to
//! the configured bounds. Date, hours, downtime and equipment are read when
//! the sheet states them and estimated otherwise.

use chrono::{Days, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use super::grid::{CellRef, CellValue, Grid};
use super::layout::{DAY_DATE_CELL, DAY_DATE_LABELS, DAY_DOWNTIME_LABELS, DAY_HOURS_LABELS};
use super::{synth, Extracted, ExtractionError, Workbook};
use crate::config::{ActivityConfig, AnalysisConfig};
use crate::demo;
use crate::types::{DailyField, DailyOperationRecord, ExtractionNote, JobRecord, NoteKind};

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\d{1,2}:\d{2}\b").expect("valid regex"))
}

fn hours_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:hours|hrs)\b").expect("valid regex")
    })
}

fn mill_mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\bmill(?:ed|ing)?\s+plug").expect("valid regex"))
}

fn ct_mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\bct\s+(?:op|milling)").expect("valid regex"))
}

/// Number of time-of-day stamps on the sheet, clamped to `[min, max]`.
pub fn count_activities(grid: &Grid, config: &ActivityConfig) -> u32 {
    let matches = count_time_stamps(grid);
    let clamped = u32::try_from(matches)
        .unwrap_or(u32::MAX)
        .clamp(config.min_activities, config.max_activities);
    if clamped as usize != matches {
        debug!(matches, clamped, "Activity count clamped");
    }
    clamped
}

/// Raw count of `H:MM` stamps across every cell.
pub(crate) fn count_time_stamps(grid: &Grid) -> usize {
    grid.cells()
        .map(|(_, v)| time_pattern().find_iter(&v.as_text()).count())
        .sum()
}

/// Read every day sheet present in the workbook.
///
/// Absent day sheets are skipped, since jobs rarely use all ten. When none
/// can be read the demo daily dataset is used.
pub fn extract_daily_operations(
    workbook: &Workbook,
    config: &AnalysisConfig,
    job: &JobRecord,
) -> Extracted<Vec<DailyOperationRecord>> {
    let wb = &config.workbook;
    let equipment_pattern = equipment_pattern(&wb.tool_sheet_prefix);
    let mut out = Extracted::new(Vec::new());

    for day in 1..=wb.day_sheet_count {
        let name = wb.day_sheet_name(day);
        match workbook.sheet(&name) {
            Ok(grid) => {
                let record = read_day(
                    grid,
                    day,
                    job,
                    config,
                    equipment_pattern.as_ref(),
                    &mut out.notes,
                );
                debug!(
                    sheet = %name,
                    activities = record.activities,
                    work_hours = record.work_hours,
                    synthesized = record.synthesized_fields.len(),
                    "Day sheet extracted"
                );
                out.value.push(record);
            }
            Err(ExtractionError::MissingSheet(_)) => {}
            Err(e) => {
                warn!(sheet = %name, error = %e, "Day sheet skipped");
                out.note(e.to_note());
            }
        }
    }

    if out.value.is_empty() {
        info!("No readable day sheets, using demo daily operations");
        out.value = demo::daily_operations();
        out.note(ExtractionNote::new(
            NoteKind::MissingSheet,
            None,
            format!(
                "no day sheets {}1..{}{} found; section defaults used",
                wb.day_sheet_prefix, wb.day_sheet_prefix, wb.day_sheet_count
            ),
        ));
        return out;
    }

    let synthesized_days = out
        .value
        .iter()
        .filter(|d| !d.synthesized_fields.is_empty())
        .count();
    if synthesized_days > 0 {
        out.note(ExtractionNote::new(
            NoteKind::Synthesized,
            None,
            format!(
                "{synthesized_days} of {} day records have estimated fields",
                out.value.len()
            ),
        ));
    }

    info!(days = out.value.len(), "Daily operations extracted");
    out
}

fn read_day(
    grid: &Grid,
    day: u32,
    job: &JobRecord,
    config: &AnalysisConfig,
    equipment_pattern: Option<&Regex>,
    notes: &mut Vec<ExtractionNote>,
) -> DailyOperationRecord {
    let activity = &config.activity;
    let prefix = &config.workbook.tool_sheet_prefix;
    let activities = count_activities(grid, activity);
    let mut synthesized = Vec::new();

    let sheet = config.workbook.day_sheet_name(day);
    let date = read_date(grid, &sheet, notes).unwrap_or_else(|| {
        synthesized.push(DailyField::Date);
        job.date_started
            .checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
            .unwrap_or(job.date_started)
    });

    let work_hours = read_work_hours(grid).unwrap_or_else(|| {
        synthesized.push(DailyField::WorkHours);
        synth::work_hours(activities, activity)
    });

    let downtime = grid
        .find_any_labeled(DAY_DOWNTIME_LABELS)
        .and_then(|v| v.as_number())
        .filter(|h| *h >= 0.0)
        .unwrap_or_else(|| {
            synthesized.push(DailyField::Downtime);
            synth::downtime(activities, activity)
        });

    let mut equipment = equipment_pattern
        .map(|re| read_equipment(grid, re, prefix, config.workbook.tool_sheet_count))
        .unwrap_or_default();
    if equipment.is_empty() {
        synthesized.push(DailyField::Equipment);
        equipment = synth::day_equipment(prefix, day);
    }

    let mentions = |re: &Regex| -> u32 {
        let n = grid.cells().filter(|(_, v)| re.is_match(&v.as_text())).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    };

    DailyOperationRecord {
        day,
        date,
        activities,
        work_hours,
        downtime,
        equipment,
        mill_operations: Some(mentions(mill_mention_pattern())),
        ct_operations: Some(mentions(ct_mention_pattern())),
        synthesized_fields: synthesized,
    }
}

/// Labeled date, else the fixed date cell.
///
/// A date-typed fixed cell that disagrees with the labeled value is noted as
/// a layout shift; the label value wins.
fn read_date(grid: &Grid, sheet: &str, notes: &mut Vec<ExtractionNote>) -> Option<NaiveDate> {
    let labeled = grid.find_any_labeled(DAY_DATE_LABELS).and_then(CellValue::as_date);
    let fixed_at = CellRef::parse(DAY_DATE_CELL);
    let fixed = fixed_at.and_then(|at| grid.cell_at_ref(at));

    match (labeled, fixed, fixed_at) {
        (Some(l), Some(f), Some(at)) => {
            let fixed_date = match f {
                CellValue::DateTime(_) | CellValue::Text(_) => f.as_date(),
                CellValue::Number(_) | CellValue::Bool(_) => None,
            };
            if let Some(d) = fixed_date.filter(|d| *d != l) {
                notes.push(ExtractionNote::new(
                    NoteKind::LayoutShift,
                    Some(sheet),
                    format!("date: label gives {l} but {at} holds {d}; label value used"),
                ));
            }
            Some(l)
        }
        (Some(l), _, _) => Some(l),
        (None, f, _) => f.and_then(CellValue::as_date),
    }
}

/// Labeled numeric hours, else the first "`<n> hours`" phrase on the sheet.
fn read_work_hours(grid: &Grid) -> Option<f64> {
    grid.find_any_labeled(DAY_HOURS_LABELS)
        .and_then(|v| v.as_number())
        .or_else(|| {
            grid.cells().find_map(|(_, v)| {
                hours_pattern()
                    .captures(&v.as_text())
                    .and_then(|c| c.get(1))
                    .and_then(|m| m.as_str().parse::<f64>().ok())
            })
        })
        .filter(|h| h.is_finite() && *h >= 0.0)
}

/// Case-insensitive `<prefix><n>` matcher, `None` for an unusable prefix.
fn equipment_pattern(prefix: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b{}\s?(\d{{1,2}})\b", regex::escape(prefix))).ok()
}

/// Distinct tool identifiers in order of first mention, limited to
/// `<prefix>1..=<prefix><max_tool>`.
fn read_equipment(grid: &Grid, pattern: &Regex, prefix: &str, max_tool: u32) -> Vec<String> {
    let mut tools: Vec<String> = Vec::new();
    for (_, value) in grid.cells() {
        let text = value.as_text();
        for caps in pattern.captures_iter(&text) {
            let Some(n) = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .filter(|n| (1..=max_tool).contains(n))
            else {
                continue;
            };
            let id = format!("{prefix}{n}");
            if !tools.contains(&id) {
                tools.push(id);
            }
        }
    }
    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobRecord {
        demo::section_default_job()
    }

    fn sheet(lines: &[&str]) -> Grid {
        Grid::from_strings(lines.iter().map(|l| vec![*l]))
    }

    #[test]
    fn test_three_time_stamps_count_three() {
        let grid = sheet(&["8:30 - Safety meeting", "10:15 - Rig up", "14:20 - Mill plug #1"]);
        assert_eq!(count_activities(&grid, &ActivityConfig::default()), 3);
    }

    #[test]
    fn test_activity_count_clamps_high() {
        let lines: Vec<String> = (0..20).map(|i| format!("{}:00 task", i % 24)).collect();
        let grid = Grid::from_strings(lines.iter().map(|l| vec![l.as_str()]));
        assert_eq!(count_time_stamps(&grid), 20);
        assert_eq!(count_activities(&grid, &ActivityConfig::default()), 15);
    }

    #[test]
    fn test_activity_count_clamps_low() {
        let grid = sheet(&["No timestamps recorded"]);
        assert_eq!(count_activities(&grid, &ActivityConfig::default()), 1);
        assert_eq!(count_activities(&Grid::default(), &ActivityConfig::default()), 1);
    }

    #[test]
    fn test_stated_values_are_read() {
        let grid = Grid::default()
            .with("A1", CellValue::text("Service Plan Day 2"))
            .with("A2", CellValue::text("Date:"))
            .with("B2", CellValue::text("2025-06-12"))
            .with("B4", CellValue::text("10.5 hours planned"))
            .with("A5", CellValue::text("Downtime"))
            .with("B5", CellValue::Number(0.5))
            .with("B10", CellValue::text("8:00 - Run FT3 and ft 4 in hole"))
            .with("B11", CellValue::text("9:30 - Mill plug #2"))
            .with("B12", CellValue::text("11:00 - CT operation stage 1"));
        let wb = Workbook::from_sheets([("SP2", grid)]);
        let out = extract_daily_operations(&wb, &AnalysisConfig::default(), &job());

        assert_eq!(out.value.len(), 1);
        let day = &out.value[0];
        assert_eq!(day.day, 2);
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 6, 12).expect("date"));
        assert_eq!(day.activities, 3);
        assert!((day.work_hours - 10.5).abs() < f64::EPSILON);
        assert!((day.downtime - 0.5).abs() < f64::EPSILON);
        assert_eq!(day.equipment, vec!["FT3", "FT4"]);
        assert_eq!(day.mill_operations, Some(1));
        assert_eq!(day.ct_operations, Some(1));
        assert!(day.synthesized_fields.is_empty());
    }

    #[test]
    fn test_out_of_range_tool_ids_are_ignored() {
        let grid = sheet(&["8:00 - Pressure test to 5000 psi, FT 0 offset, tally FT99"]);
        let wb = Workbook::from_sheets([("SP1", grid)]);
        let out = extract_daily_operations(&wb, &AnalysisConfig::default(), &job());
        let day = &out.value[0];

        assert_eq!(day.equipment, vec!["FT1", "FT2"]);
        assert!(day.is_synthesized(DailyField::Equipment));
    }

    #[test]
    fn test_tool_id_limit_follows_tool_sheet_count() {
        let mut config = AnalysisConfig::default();
        config.workbook.tool_sheet_count = 4;
        let grid = sheet(&["8:00 - RIH with FT4, FT5 on standby, FT15 racked"]);
        let wb = Workbook::from_sheets([("SP2", grid)]);
        let out = extract_daily_operations(&wb, &config, &job());
        assert_eq!(out.value[0].equipment, vec!["FT4"]);
    }

    #[test]
    fn test_date_label_ignores_unrelated_text() {
        let grid = Grid::default()
            .with("A1", CellValue::text("Updated by"))
            .with("B1", CellValue::text("2025-01-01"))
            .with("B2", CellValue::text("2025-06-12"))
            .with("A4", CellValue::text("8:00 - Safety meeting"));
        let wb = Workbook::from_sheets([("SP2", grid)]);
        let out = extract_daily_operations(&wb, &AnalysisConfig::default(), &job());

        assert_eq!(out.value[0].date, NaiveDate::from_ymd_opt(2025, 6, 12).expect("date"));
        assert!(!out.value[0].is_synthesized(DailyField::Date));
        assert!(out.notes.iter().all(|n| n.kind != NoteKind::LayoutShift));
    }

    #[test]
    fn test_date_label_and_cell_disagreement_is_noted() {
        let grid = Grid::default()
            .with("A1", CellValue::text("Report Date:"))
            .with("B1", CellValue::text("2025-06-14"))
            .with("B2", CellValue::text("2025-06-12"))
            .with("A4", CellValue::text("8:00 - Safety meeting"));
        let wb = Workbook::from_sheets([("SP2", grid)]);
        let out = extract_daily_operations(&wb, &AnalysisConfig::default(), &job());

        assert_eq!(out.value[0].date, NaiveDate::from_ymd_opt(2025, 6, 14).expect("date"));
        let shift = out
            .notes
            .iter()
            .find(|n| n.kind == NoteKind::LayoutShift)
            .expect("layout shift note");
        assert_eq!(shift.sheet.as_deref(), Some("SP2"));
    }

    #[test]
    fn test_numeric_cell_below_date_is_not_a_conflict() {
        let grid = Grid::default()
            .with("A1", CellValue::text("Date:"))
            .with("B1", CellValue::text("2025-06-11"))
            .with("A2", CellValue::text("Work Hours:"))
            .with("B2", CellValue::Number(10.5));
        let wb = Workbook::from_sheets([("SP1", grid)]);
        let out = extract_daily_operations(&wb, &AnalysisConfig::default(), &job());
        assert!(out.notes.iter().all(|n| n.kind != NoteKind::LayoutShift));
    }

    #[test]
    fn test_sparse_day_is_estimated() {
        let grid = sheet(&["8:00 a", "9:00 b", "10:00 c", "11:00 d", "12:00 e"]);
        let wb = Workbook::from_sheets([("SP3", grid)]);
        let job = job();
        let out = extract_daily_operations(&wb, &AnalysisConfig::default(), &job);
        let day = &out.value[0];

        assert_eq!(day.activities, 5);
        assert!((day.work_hours - 6.0).abs() < 1e-9);
        assert!((day.downtime - 1.5).abs() < 1e-9);
        assert_eq!(day.equipment, vec!["FT3", "FT4"]);
        assert_eq!(day.date, job.date_started + chrono::Duration::days(2));
        assert!(day.is_synthesized(DailyField::Date));
        assert!(out.notes.iter().any(|n| n.kind == NoteKind::Synthesized));
    }

    #[test]
    fn test_days_are_ordered_and_missing_sheets_skipped() {
        let wb = Workbook::from_sheets([
            ("SP3", sheet(&["8:00 x"])),
            ("SP1", sheet(&["8:00 x"])),
        ]);
        let out = extract_daily_operations(&wb, &AnalysisConfig::default(), &job());
        let days: Vec<u32> = out.value.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![1, 3]);
        assert!(out.notes.iter().all(|n| n.kind != NoteKind::MissingSheet));
    }

    #[test]
    fn test_no_day_sheets_uses_demo_days() {
        let out = extract_daily_operations(&Workbook::default(), &AnalysisConfig::default(), &job());
        assert_eq!(out.value, demo::daily_operations());
        assert_eq!(out.notes[0].kind, NoteKind::MissingSheet);
    }
}
