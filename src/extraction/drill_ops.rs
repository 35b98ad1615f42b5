//! Per-plug drill operations (`Mill Data` and `CT Milling` sheets)
//!
//! Both sheets share one row reader; they differ in row window, column map
//! and how the scan terminates:
//!
//! | Sheet       | Rows         | Scan                          |
//! |-------------|--------------|-------------------------------|
//! | Mill Data   | 16..=25      | fixed window, blank rows skip |
//! | CT Milling  | 11..         | stop at first blank row       |
//!
//! Present-but-empty sheets are filled with the nominal operation count;
//! blank fields inside a populated row are synthesized individually.

use chrono::NaiveTime;
use tracing::{debug, info};

use super::grid::Grid;
use super::layout::{DrillColumns, CT_COLUMNS, CT_FIRST_ROW, MILL_COLUMNS, MILL_FIRST_ROW, MILL_LAST_ROW};
use super::{Extracted, Synthesizer, Workbook};
use crate::config::AnalysisConfig;
use crate::demo;
use crate::types::{DrillField, DrillKind, DrillOperation, ExtractionNote, NoteKind};

/// Row window and column map for one drill sheet.
#[derive(Debug, Clone, Copy)]
struct SheetLayout {
    kind: DrillKind,
    first_row: usize,
    max_rows: usize,
    stop_at_blank: bool,
    columns: DrillColumns,
}

/// Raw cell values of one populated row.
#[derive(Debug, Default)]
struct RawRow {
    plug: Option<f64>,
    tag_time: Option<NaiveTime>,
    tag_depth: Option<f64>,
    drill_time: Option<f64>,
    actual_depth: Option<f64>,
    depth_delta: Option<f64>,
    torque: Option<f64>,
    pressure: Option<f64>,
}

/// Read mill drilling data.
pub fn extract_mill_operations(
    workbook: &Workbook,
    config: &AnalysisConfig,
    synth: &mut Synthesizer,
) -> Extracted<Vec<DrillOperation>> {
    let layout = SheetLayout {
        kind: DrillKind::Mill,
        first_row: MILL_FIRST_ROW,
        max_rows: MILL_LAST_ROW - MILL_FIRST_ROW + 1,
        stop_at_blank: false,
        columns: MILL_COLUMNS,
    };
    extract(workbook, &config.workbook.mill_sheet, layout, config, synth)
}

/// Read coiled-tubing milling data.
pub fn extract_ct_operations(
    workbook: &Workbook,
    config: &AnalysisConfig,
    synth: &mut Synthesizer,
) -> Extracted<Vec<DrillOperation>> {
    let layout = SheetLayout {
        kind: DrillKind::CoiledTubing,
        first_row: CT_FIRST_ROW,
        max_rows: config.workbook.ct_max_rows as usize,
        stop_at_blank: true,
        columns: CT_COLUMNS,
    };
    extract(workbook, &config.workbook.ct_sheet, layout, config, synth)
}

fn extract(
    workbook: &Workbook,
    sheet: &str,
    layout: SheetLayout,
    config: &AnalysisConfig,
    synth: &mut Synthesizer,
) -> Extracted<Vec<DrillOperation>> {
    let grid = match workbook.sheet(sheet) {
        Ok(grid) => grid,
        Err(e) => {
            info!(sheet, kind = layout.kind.label(), error = %e, "Drill data unavailable, using section defaults");
            let defaults = match layout.kind {
                DrillKind::Mill => demo::mill_operations(),
                DrillKind::CoiledTubing => demo::ct_operations(),
            };
            return Extracted::with_notes(defaults, vec![e.to_note()]);
        }
    };

    let rows = read_rows(grid, &layout);
    let max_ok = config.drilling.max_successful_drill_time_mins;
    let mut out = Extracted::new(Vec::new());

    if rows.is_empty() {
        let n = synth.nominal_count(layout.kind);
        out.value = (1..=n)
            .map(|plug| build_operation(plug, RawRow::default(), layout.kind, max_ok, synth))
            .collect();
        out.note(ExtractionNote::new(
            NoteKind::Synthesized,
            Some(sheet),
            format!("no {} rows found; {n} placeholder operations synthesized", layout.kind.label()),
        ));
        info!(sheet, count = n, "Synthesized nominal drill operations");
        return out;
    }

    out.value = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let fallback_plug = u32::try_from(i + 1).unwrap_or(u32::MAX);
            build_operation(fallback_plug, raw, layout.kind, max_ok, synth)
        })
        .collect();
    out.value.sort_by_key(|op| op.plug_number);

    let sparse = out.value.iter().filter(|op| op.is_synthesized()).count();
    if sparse > 0 {
        out.note(ExtractionNote::new(
            NoteKind::Synthesized,
            Some(sheet),
            format!(
                "{sparse} of {} {} operations have synthesized fields",
                out.value.len(),
                layout.kind.label()
            ),
        ));
    }

    debug!(sheet, count = out.value.len(), sparse, "Drill operations extracted");
    out
}

fn read_rows(grid: &Grid, layout: &SheetLayout) -> Vec<RawRow> {
    let mut rows = Vec::new();
    for row in layout.first_row..layout.first_row + layout.max_rows {
        let populated = layout
            .columns
            .data_columns()
            .any(|col| grid.cell_at(row, col).is_some());
        if !populated {
            if layout.stop_at_blank {
                break;
            }
            continue;
        }

        let cols = &layout.columns;
        let number = |col: usize| grid.cell_at(row, col).and_then(|v| v.as_number());
        rows.push(RawRow {
            plug: number(cols.plug),
            tag_time: grid.cell_at(row, cols.tag_time).and_then(|v| v.as_time()),
            tag_depth: number(cols.tag_depth),
            drill_time: number(cols.drill_time).filter(|t| *t > 0.0),
            actual_depth: number(cols.actual_depth),
            depth_delta: number(cols.depth_delta),
            torque: cols.torque.and_then(number),
            pressure: cols.pressure.and_then(number),
        });
    }
    rows
}

/// Fill gaps in a raw row and derive delta and success.
///
/// Depths fill from each other when one is known, otherwise from the
/// synthetic depth sequence for this plug number.
fn build_operation(
    fallback_plug: u32,
    raw: RawRow,
    kind: DrillKind,
    max_successful_mins: f64,
    synth: &mut Synthesizer,
) -> DrillOperation {
    let mut synthesized = Vec::new();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let plug_number = match raw.plug.filter(|p| *p >= 1.0 && *p < f64::from(u32::MAX)) {
        Some(p) => p.round() as u32,
        None => {
            synthesized.push(DrillField::PlugNumber);
            fallback_plug
        }
    };

    let offset = synth.depth_offset(kind);
    let (tag_depth, actual_depth) = match (raw.tag_depth, raw.actual_depth) {
        (Some(tag), Some(actual)) => (tag, actual),
        (Some(tag), None) => {
            synthesized.push(DrillField::ActualDepth);
            (tag, tag + offset)
        }
        (None, Some(actual)) => {
            synthesized.push(DrillField::TagDepth);
            (actual - offset, actual)
        }
        (None, None) => {
            synthesized.extend([DrillField::TagDepth, DrillField::ActualDepth]);
            let tag = synth.tag_depth(kind, plug_number);
            (tag, tag + offset)
        }
    };

    let depth_delta = match raw.depth_delta {
        Some(delta) => delta,
        None => {
            if synthesized.contains(&DrillField::TagDepth) || synthesized.contains(&DrillField::ActualDepth) {
                synthesized.push(DrillField::DepthDelta);
            }
            actual_depth - tag_depth
        }
    };

    let drill_time_mins = raw.drill_time.unwrap_or_else(|| {
        synthesized.push(DrillField::DrillTime);
        synth.drill_time(kind)
    });

    DrillOperation {
        plug_number,
        tag_time: raw.tag_time,
        tag_depth,
        drill_time_mins,
        actual_depth,
        depth_delta,
        torque: raw.torque,
        pressure_psi: raw.pressure,
        success: drill_time_mins > 0.0 && drill_time_mins <= max_successful_mins,
        synthesized_fields: synthesized,
    }
}
