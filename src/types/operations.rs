//! Daily operation records and per-plug drill operations

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Daily Operations (SP sheets)
// ============================================================================

/// Daily record fields that may be synthesized when the sheet lacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyField {
    Date,
    WorkHours,
    Downtime,
    Equipment,
}

/// One operational day, extracted from a service-plan sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOperationRecord {
    /// 1-based day index, unique within a run
    pub day: u32,
    pub date: NaiveDate,
    /// Time-stamped activity count, clamped to the configured bounds
    pub activities: u32,
    pub work_hours: f64,
    /// Downtime hours (may exceed work hours in degenerate input)
    pub downtime: f64,
    /// Tool identifiers used that day
    pub equipment: Vec<String>,
    pub mill_operations: Option<u32>,
    pub ct_operations: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synthesized_fields: Vec<DailyField>,
}

impl DailyOperationRecord {
    pub fn is_synthesized(&self, field: DailyField) -> bool {
        self.synthesized_fields.contains(&field)
    }
}

// ============================================================================
// Drill Operations (Mill Data / CT Milling sheets)
// ============================================================================

/// Which sheet a drill operation was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillKind {
    Mill,
    CoiledTubing,
}

impl DrillKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mill => "mill",
            Self::CoiledTubing => "coiled tubing",
        }
    }
}

/// Drill operation fields that may be synthesized for sparse sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillField {
    PlugNumber,
    TagDepth,
    DrillTime,
    ActualDepth,
    DepthDelta,
}

/// A single plug/seat drilled out by mill or coiled tubing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillOperation {
    /// Plug/seat sequence number
    pub plug_number: u32,
    pub tag_time: Option<NaiveTime>,
    /// Depth at which the plug was tagged (ft)
    pub tag_depth: f64,
    /// Drill time (minutes)
    pub drill_time_mins: f64,
    /// Actual / set depth after drilling (ft)
    pub actual_depth: f64,
    /// `actual_depth - tag_depth` unless the sheet states it (ft)
    pub depth_delta: f64,
    /// Free swivel torque (mill only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub torque: Option<f64>,
    /// Circulating pressure in psi (mill only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_psi: Option<f64>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synthesized_fields: Vec<DrillField>,
}

impl DrillOperation {
    /// True when any field on this operation was fabricated.
    pub fn is_synthesized(&self) -> bool {
        !self.synthesized_fields.is_empty()
    }
}
