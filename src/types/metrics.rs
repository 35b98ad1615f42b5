//! Derived metric groups computed by the metrics engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operational frequency over the daily breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationalFrequency {
    pub total_operational_days: usize,
    pub total_activities: u32,
    pub avg_activities_per_day: f64,
    pub total_work_hours: f64,
    pub avg_hours_per_day: f64,
    /// Day index with the highest activity count (first wins on ties)
    pub peak_activity_day: u32,
    /// Tool identifier appearing on the most days, if any day lists equipment
    pub most_common_equipment: Option<String>,
}

/// Success-rate performance bucket for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceBucket {
    Excellent,
    Good,
    Poor,
}

/// Equipment frequency and deployment quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentFrequency {
    pub total_tools_deployed: usize,
    pub tools_with_issues: usize,
    pub performance_distribution: BTreeMap<PerformanceBucket, usize>,
    pub most_used_tool_type: Option<String>,
    pub deployment_success_rate: f64,
    pub tools_due_for_maintenance: Vec<String>,
}

/// Work-hour and downtime patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAnalysis {
    pub avg_daily_hours: f64,
    pub max_daily_hours: f64,
    pub min_daily_hours: f64,
    pub total_downtime: f64,
    pub downtime_percentage: f64,
}

/// Productivity and efficiency metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    pub activities_per_hour: f64,
    pub hours_per_day_avg: f64,
    pub job_completion_rate: f64,
    pub equipment_utilization: f64,
    pub drilling_efficiency: f64,
    pub safety_score: f64,
}

/// Mill operation performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MillPerformance {
    pub total_plugs_drilled: usize,
    /// Sum of absolute depth deltas (ft)
    pub total_footage: f64,
    pub avg_drill_time_mins: f64,
    pub min_drill_time_mins: f64,
    pub max_drill_time_mins: f64,
    /// Percentage of operations flagged successful
    pub success_rate: f64,
    pub efficiency_rating: String,
    /// Operations with at least one synthesized field
    pub synthesized_operations: usize,
}

/// Coiled-tubing operation performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtPerformance {
    pub total_ct_operations: usize,
    pub avg_ct_drill_time: f64,
    /// Percentage of operations landing within the depth tolerance
    pub depth_accuracy: f64,
    pub success_rate: f64,
    pub efficiency_rating: String,
    pub synthesized_operations: usize,
}
