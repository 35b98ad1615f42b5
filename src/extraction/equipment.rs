//! Equipment extraction (`FT1`..`FT15` tool sheets)

use chrono::NaiveTime;
use tracing::{debug, info, warn};

use super::grid::{CellRef, CellValue, Grid};
use super::layout::{
    TOOL_DEPLOYED_CELL, TOOL_DEPLOYED_LABELS, TOOL_RETRIEVED_CELL, TOOL_RETRIEVED_LABELS,
    TOOL_STATUS_CELL, TOOL_STATUS_LABELS, TOOL_TYPE_CELL, TOOL_TYPE_LABELS,
};
use super::service_plan::count_time_stamps;
use super::{synth, Extracted, ExtractionError, Workbook};
use crate::config::WorkbookConfig;
use crate::demo;
use crate::types::{EquipmentField, EquipmentRecord, EquipmentUsage, ExtractionNote, NoteKind, ToolId};

/// Tool type recorded when a sheet names none.
pub const UNKNOWN_TOOL_TYPE: &str = "Unknown";

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Status words that keep a successful tool on the maintenance list.
const WEAR_KEYWORDS: [&str; 3] = ["worn", "damage", "repair"];

/// Read every tool sheet present in the workbook.
pub fn extract_equipment(workbook: &Workbook, config: &WorkbookConfig) -> Extracted<EquipmentUsage> {
    let mut out = Extracted::new(EquipmentUsage::new());

    for tool in 1..=config.tool_sheet_count {
        let name = config.tool_sheet_name(tool);
        match workbook.sheet(&name) {
            Ok(grid) => {
                let record = read_tool(grid, tool);
                debug!(
                    tool = %name,
                    tool_type = %record.tool_type,
                    success_rate = record.success_rate,
                    "Tool sheet extracted"
                );
                out.value.insert(ToolId::new(&config.tool_sheet_prefix, tool), record);
            }
            Err(ExtractionError::MissingSheet(_)) => {}
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool sheet skipped");
                out.note(e.to_note());
            }
        }
    }

    if out.value.is_empty() {
        info!("No readable tool sheets, using demo equipment");
        out.value = demo::equipment_usage();
        out.note(ExtractionNote::new(
            NoteKind::MissingSheet,
            None,
            format!(
                "no tool sheets {}1..{}{} found; section defaults used",
                config.tool_sheet_prefix, config.tool_sheet_prefix, config.tool_sheet_count
            ),
        ));
        return out;
    }

    let estimated = out
        .value
        .values()
        .filter(|r| !r.synthesized_fields.is_empty())
        .count();
    if estimated > 0 {
        out.note(ExtractionNote::new(
            NoteKind::Synthesized,
            None,
            format!("{estimated} of {} tool records have estimated fields", out.value.len()),
        ));
    }

    info!(tools = out.value.len(), "Equipment extracted");
    out
}

fn read_tool(grid: &Grid, tool: u32) -> EquipmentRecord {
    let mut synthesized = Vec::new();

    let tool_type = lookup(grid, TOOL_TYPE_LABELS, TOOL_TYPE_CELL)
        .map(|v| v.as_text().trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            synthesized.push(EquipmentField::ToolType);
            UNKNOWN_TOOL_TYPE.to_string()
        });

    let deployed = lookup(grid, TOOL_DEPLOYED_LABELS, TOOL_DEPLOYED_CELL).and_then(CellValue::as_time);
    let retrieved = lookup(grid, TOOL_RETRIEVED_LABELS, TOOL_RETRIEVED_CELL).and_then(CellValue::as_time);
    let avg_deployment_time = deployed
        .zip(retrieved)
        .map(|(d, r)| deployment_hours(d, r))
        .unwrap_or_else(|| {
            synthesized.push(EquipmentField::DeploymentTime);
            synth::tool_deployment_hours(tool)
        });

    let status = lookup(grid, TOOL_STATUS_LABELS, TOOL_STATUS_CELL).map(CellValue::as_text);
    let success_rate = status
        .as_deref()
        .and_then(status_success_rate)
        .unwrap_or_else(|| {
            synthesized.push(EquipmentField::SuccessRate);
            synth::tool_success_rate(tool)
        });

    let worn = status.as_deref().is_some_and(|s| {
        let s = s.to_lowercase();
        WEAR_KEYWORDS.iter().any(|k| s.contains(k))
    });

    EquipmentRecord {
        tool_type,
        usage_count: usage_count(grid),
        success_rate,
        avg_deployment_time,
        maintenance_due: success_rate < 100.0 || worn,
        synthesized_fields: synthesized,
    }
}

fn lookup<'g>(grid: &'g Grid, labels: &[&str], a1: &str) -> Option<&'g CellValue> {
    grid.find_any_labeled(labels)
        .or_else(|| CellRef::parse(a1).and_then(|at| grid.cell_at_ref(at)))
}

/// Deployments on the sheet: one per deploy/retrieve timestamp pair, rounded up.
///
/// An empty sheet has zero usage.
pub fn usage_count(grid: &Grid) -> u32 {
    let stamps = u32::try_from(count_time_stamps(grid)).unwrap_or(u32::MAX);
    stamps.div_ceil(2)
}

/// Hours between deployment and retrieval, wrapping past midnight.
fn deployment_hours(deployed: NaiveTime, retrieved: NaiveTime) -> f64 {
    let mut minutes = (retrieved - deployed).num_minutes();
    if minutes < 0 {
        minutes += MINUTES_PER_DAY;
    }
    #[allow(clippy::cast_precision_loss)]
    let hours = minutes as f64 / 60.0;
    (hours * 10.0).round() / 10.0
}

/// Map a free-text status to a success rate.
///
/// Failure words win over success words ("unsuccessful" is a failure);
/// any other non-empty status is a partial result.
pub fn status_success_rate(status: &str) -> Option<f64> {
    const FAILURE: [&str; 4] = ["fail", "lost", "unsuccess", "stuck"];
    const SUCCESS: [&str; 4] = ["success", "good", "complete", "recovered"];

    let s = status.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }
    if FAILURE.iter().any(|k| s.contains(k)) {
        return Some(0.0);
    }
    let is_ok_word = s.split(|c: char| !c.is_alphanumeric()).any(|w| w == "ok");
    if is_ok_word || SUCCESS.iter().any(|k| s.contains(k)) {
        return Some(100.0);
    }
    Some(50.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_tool_sheet(status: &str) -> Grid {
        Grid::default()
            .with("A1", CellValue::text("FIELD TOOL REPORT"))
            .with("B5", CellValue::text("Junk Mill"))
            .with("B6", CellValue::text("08:30"))
            .with("B7", CellValue::text("11:00"))
            .with("B8", CellValue::text(status))
    }

    fn extract(sheets: Vec<(&str, Grid)>) -> Extracted<EquipmentUsage> {
        extract_equipment(&Workbook::from_sheets(sheets), &WorkbookConfig::default())
    }

    #[test]
    fn test_fixed_cells_are_read() {
        let out = extract(vec![("FT1", standard_tool_sheet("Successful"))]);
        let record = &out.value[&ToolId::from("FT1")];
        assert_eq!(record.tool_type, "Junk Mill");
        assert!((record.avg_deployment_time - 2.5).abs() < 1e-9);
        assert!((record.success_rate - 100.0).abs() < f64::EPSILON);
        assert_eq!(record.usage_count, 1);
        assert!(!record.maintenance_due);
        assert!(record.synthesized_fields.is_empty());
    }

    #[test]
    fn test_labels_override_fixed_cells() {
        let grid = Grid::from_strings([
            vec!["Tool Type", "Overshot"],
            vec!["Deployment Time", "22:00"],
            vec!["Retrieval Time", "01:30"],
            vec!["Status", "Worn - recovered"],
        ]);
        let out = extract(vec![("FT2", grid)]);
        let record = &out.value[&ToolId::from("FT2")];
        assert_eq!(record.tool_type, "Overshot");
        assert!((record.avg_deployment_time - 3.5).abs() < 1e-9);
        assert!((record.success_rate - 100.0).abs() < f64::EPSILON);
        assert!(record.maintenance_due);
    }

    #[test]
    fn test_failed_tool_needs_maintenance() {
        let out = extract(vec![("FT4", standard_tool_sheet("Failed - lost in hole"))]);
        let record = &out.value[&ToolId::from("FT4")];
        assert!(record.success_rate.abs() < f64::EPSILON);
        assert!(record.maintenance_due);
    }

    #[test]
    fn test_empty_sheet_is_synthesized() {
        let out = extract(vec![("FT3", Grid::default()), ("FT5", Grid::default())]);
        let ft3 = &out.value[&ToolId::from("FT3")];
        assert_eq!(ft3.usage_count, 0);
        assert_eq!(ft3.tool_type, UNKNOWN_TOOL_TYPE);
        assert!((ft3.success_rate - 50.0).abs() < f64::EPSILON);
        assert!(ft3.maintenance_due);
        assert!((ft3.avg_deployment_time - 2.9).abs() < 1e-9);

        let ft5 = &out.value[&ToolId::from("FT5")];
        assert!((ft5.success_rate - 100.0).abs() < f64::EPSILON);
        assert!(!ft5.maintenance_due);
        assert!(out.notes.iter().any(|n| n.kind == NoteKind::Synthesized));
    }

    #[test]
    fn test_tools_are_keyed_in_numeric_order() {
        let out = extract(vec![
            ("FT10", standard_tool_sheet("OK")),
            ("FT2", standard_tool_sheet("OK")),
        ]);
        let keys: Vec<&str> = out.value.keys().map(ToolId::as_str).collect();
        assert_eq!(keys, vec!["FT2", "FT10"]);
    }

    #[test]
    fn test_no_tool_sheets_uses_demo_equipment() {
        let out = extract(Vec::new());
        assert_eq!(out.value, demo::equipment_usage());
        assert_eq!(out.notes[0].kind, NoteKind::MissingSheet);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_success_rate("Successful"), Some(100.0));
        assert_eq!(status_success_rate("ok"), Some(100.0));
        assert_eq!(status_success_rate("Unsuccessful"), Some(0.0));
        assert_eq!(status_success_rate("Broken jaw"), Some(50.0));
        assert_eq!(status_success_rate("Partial"), Some(50.0));
        assert_eq!(status_success_rate("   "), None);
    }

    #[test]
    fn test_usage_rounds_up_pairs() {
        let grid = Grid::from_strings([vec!["08:00", "10:00", "13:00"]]);
        assert_eq!(usage_count(&grid), 2);
        assert_eq!(usage_count(&Grid::default()), 0);
    }
}
