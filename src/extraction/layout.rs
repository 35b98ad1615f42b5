//! Field tool kit layout tables
//!
//! Declares where each value lives: the label to search for first and the
//! fixed A1 coordinate used when the label is absent. Row and column
//! indices are zero-based.

use crate::types::JobField;

// ============================================================================
// General Info
// ============================================================================

/// How a job field's raw cell is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Text,
    Date,
}

/// Location of one job metadata field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: JobField,
    /// Label spellings tried in order
    pub labels: &'static [&'static str],
    /// Fixed coordinate of the value in the standard kit
    pub fallback: Option<&'static str>,
    pub shape: FieldShape,
}

const fn text(
    field: JobField,
    labels: &'static [&'static str],
    fallback: Option<&'static str>,
) -> FieldSpec {
    FieldSpec {
        field,
        labels,
        fallback,
        shape: FieldShape::Text,
    }
}

const fn date(field: JobField, labels: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        field,
        labels,
        fallback: None,
        shape: FieldShape::Date,
    }
}

pub const JOB_FIELDS: &[FieldSpec] = &[
    text(JobField::CustomerName, &["Customer Name", "Customer"], Some("C12")),
    text(JobField::TicketNumber, &["Ticket Number", "Ticket #"], Some("E12")),
    date(JobField::DateStarted, &["Date Started", "Start Date"]),
    date(JobField::DateEnded, &["Date Ended", "End Date"]),
    text(JobField::JobType, &["Job Type"], Some("C21")),
    text(JobField::WellNumber, &["Well #", "Well Number"], Some("C23")),
    text(JobField::Lease, &["Lease"], Some("C23")),
    text(JobField::County, &["County"], Some("C24")),
    text(JobField::RigName, &["Rig Name", "Rig #"], Some("E24")),
    text(JobField::AfePo, &["AFE / PO", "AFE/PO", "AFE"], Some("E25")),
    text(
        JobField::DaySupervisor,
        &["Day Supervisor", "Day YJOS Supervisor"],
        Some("E13"),
    ),
    text(JobField::NightSupervisor, &["Night Supervisor"], None),
];

// ============================================================================
// Mill Data
// ============================================================================

/// First data row (sheet row 16).
pub const MILL_FIRST_ROW: usize = 15;

/// Last data row (sheet row 25).
pub const MILL_LAST_ROW: usize = 24;

/// Column map for one drill-operation table.
#[derive(Debug, Clone, Copy)]
pub struct DrillColumns {
    pub plug: usize,
    pub tag_time: usize,
    pub tag_depth: usize,
    pub drill_time: usize,
    pub actual_depth: usize,
    pub depth_delta: usize,
    pub torque: Option<usize>,
    pub pressure: Option<usize>,
}

impl DrillColumns {
    /// Columns that make a row count as populated.
    pub fn data_columns(&self) -> impl Iterator<Item = usize> + '_ {
        [
            Some(self.plug),
            Some(self.tag_time),
            Some(self.tag_depth),
            Some(self.drill_time),
            Some(self.actual_depth),
            Some(self.depth_delta),
            self.torque,
            self.pressure,
        ]
        .into_iter()
        .flatten()
    }
}

/// A..H: plug, tag time, tag depth, drill time, actual depth, delta, torque, pressure.
pub const MILL_COLUMNS: DrillColumns = DrillColumns {
    plug: 0,
    tag_time: 1,
    tag_depth: 2,
    drill_time: 3,
    actual_depth: 4,
    depth_delta: 5,
    torque: Some(6),
    pressure: Some(7),
};

// ============================================================================
// CT Milling
// ============================================================================

/// First data row below the header (sheet row 11).
pub const CT_FIRST_ROW: usize = 10;

/// A..F: plug, tag time, set depth, tag depth, delta, drill time.
pub const CT_COLUMNS: DrillColumns = DrillColumns {
    plug: 0,
    tag_time: 1,
    actual_depth: 2,
    tag_depth: 3,
    depth_delta: 4,
    drill_time: 5,
    torque: None,
    pressure: None,
};

// ============================================================================
// Day Sheets (SP)
// ============================================================================

pub const DAY_DATE_LABELS: &[&str] = &["Date:"];
pub const DAY_DATE_CELL: &str = "B2";
pub const DAY_HOURS_LABELS: &[&str] = &["Work Hours", "Total Hours"];
pub const DAY_DOWNTIME_LABELS: &[&str] = &["Downtime", "Down Time", "NPT"];

// ============================================================================
// Tool Sheets (FT)
// ============================================================================

pub const TOOL_TYPE_LABELS: &[&str] = &["Tool Type"];
pub const TOOL_TYPE_CELL: &str = "B5";
pub const TOOL_DEPLOYED_LABELS: &[&str] = &["Deployment Time", "Time Deployed", "Deployed At"];
pub const TOOL_DEPLOYED_CELL: &str = "B6";
pub const TOOL_RETRIEVED_LABELS: &[&str] = &["Retrieval Time", "Time Retrieved", "Retrieved At"];
pub const TOOL_RETRIEVED_CELL: &str = "B7";
pub const TOOL_STATUS_LABELS: &[&str] = &["Status", "Result"];
pub const TOOL_STATUS_CELL: &str = "B8";
