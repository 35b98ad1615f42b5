//! Pass-through exports of an analysis result
//!
//! - Full result as pretty JSON
//! - Condensed drilling report JSON for management review
//! - Daily breakdown and equipment tables as CSV
//!
//! File names carry the job ticket number, sanitized for the filesystem.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::defaults::{DRILLING_EFFICIENCY_NO_DATA, SAFETY_SCORE_CLEAN};
use crate::types::{
    AnalysisResult, CtPerformance, DailyOperationRecord, EquipmentUsage, JobRecord,
    MillPerformance, Severity,
};

/// Stem used when the ticket number is empty after sanitizing.
const FALLBACK_STEM: &str = "DEMO";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// JSON
// ============================================================================

pub fn to_json(result: &AnalysisResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn from_json(text: &str) -> Result<AnalysisResult, ExportError> {
    Ok(serde_json::from_str(text)?)
}

/// Condensed report: job, drilling performance, headline metrics,
/// equipment status and recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillingReport {
    #[serde(rename = "Job Information")]
    pub job_information: JobRecord,
    #[serde(rename = "Drilling Performance")]
    pub drilling_performance: DrillingPerformance,
    #[serde(rename = "Key Metrics")]
    pub key_metrics: KeyMetrics,
    #[serde(rename = "Equipment Status")]
    pub equipment_status: EquipmentUsage,
    #[serde(rename = "Recommendations")]
    pub recommendations: Vec<String>,
    #[serde(rename = "Recommendation Severities")]
    pub recommendation_severities: Vec<Severity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillingPerformance {
    #[serde(rename = "Mill Operations", with = "crate::types::metric_group")]
    pub mill_operations: Option<MillPerformance>,
    #[serde(rename = "CT Operations", with = "crate::types::metric_group")]
    pub ct_operations: Option<CtPerformance>,
    #[serde(rename = "Overall Efficiency")]
    pub overall_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    #[serde(rename = "Total Activities")]
    pub total_activities: u32,
    #[serde(rename = "Total Work Hours")]
    pub total_work_hours: f64,
    #[serde(rename = "Equipment Success Rate")]
    pub equipment_success_rate: f64,
    #[serde(rename = "Safety Score")]
    pub safety_score: f64,
}

impl DrillingReport {
    /// Missing efficiency falls back to the no-mill-data scores; missing
    /// totals report zero.
    pub fn from_result(result: &AnalysisResult) -> Self {
        let efficiency = result.efficiency_metrics.as_ref();
        let operational = result.operational_frequency.as_ref();

        Self {
            job_information: result.job_summary.clone(),
            drilling_performance: DrillingPerformance {
                mill_operations: result.mill_performance.clone(),
                ct_operations: result.ct_performance.clone(),
                overall_efficiency: efficiency
                    .map_or(DRILLING_EFFICIENCY_NO_DATA, |e| e.drilling_efficiency),
            },
            key_metrics: KeyMetrics {
                total_activities: operational.map_or(0, |o| o.total_activities),
                total_work_hours: operational.map_or(0.0, |o| o.total_work_hours),
                equipment_success_rate: result
                    .equipment_frequency
                    .as_ref()
                    .map_or(0.0, |e| e.deployment_success_rate),
                safety_score: efficiency.map_or(SAFETY_SCORE_CLEAN, |e| e.safety_score),
            },
            equipment_status: result.equipment_usage.clone(),
            recommendations: result
                .recommendations
                .iter()
                .map(|r| r.message.clone())
                .collect(),
            recommendation_severities: result.recommendations.iter().map(|r| r.severity).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// CSV
// ============================================================================

#[derive(Serialize)]
struct DailyRow<'a> {
    day: u32,
    date: String,
    activities: u32,
    work_hours: f64,
    downtime: f64,
    equipment: String,
    mill_operations: Option<u32>,
    ct_operations: Option<u32>,
    synthesized: &'a str,
}

#[derive(Serialize)]
struct EquipmentRow<'a> {
    tool: &'a str,
    tool_type: &'a str,
    usage_count: u32,
    success_rate: f64,
    avg_deployment_time: f64,
    maintenance_due: bool,
    synthesized: &'a str,
}

const fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// One row per day; equipment identifiers are `;`-joined.
pub fn write_daily_csv<W: Write>(writer: W, days: &[DailyOperationRecord]) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for day in days {
        csv.serialize(DailyRow {
            day: day.day,
            date: day.date.format("%Y-%m-%d").to_string(),
            activities: day.activities,
            work_hours: day.work_hours,
            downtime: day.downtime,
            equipment: day.equipment.join(";"),
            mill_operations: day.mill_operations,
            ct_operations: day.ct_operations,
            synthesized: yes_no(!day.synthesized_fields.is_empty()),
        })?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// One row per tool, in tool-number order.
pub fn write_equipment_csv<W: Write>(writer: W, usage: &EquipmentUsage) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for (tool, record) in usage {
        csv.serialize(EquipmentRow {
            tool: tool.as_str(),
            tool_type: &record.tool_type,
            usage_count: record.usage_count,
            success_rate: record.success_rate,
            avg_deployment_time: record.avg_deployment_time,
            maintenance_due: record.maintenance_due,
            synthesized: yes_no(!record.synthesized_fields.is_empty()),
        })?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

// ============================================================================
// Files
// ============================================================================

/// Ticket number reduced to `[A-Za-z0-9_-]`.
pub fn file_stem(job: &JobRecord) -> String {
    let stem: String = job
        .ticket_number
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.trim_matches('_').is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn write_text(path: &Path, text: &str) -> Result<(), ExportError> {
    std::fs::write(path, text).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write every export into `dir`, returning the paths written.
pub fn write_all(result: &AnalysisResult, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let stem = file_stem(&result.job_summary);

    let analysis = dir.join(format!("drillout_analysis_{stem}.json"));
    write_text(&analysis, &to_json(result)?)?;

    let report = dir.join(format!("drilling_report_{stem}.json"));
    write_text(&report, &DrillingReport::from_result(result).to_json()?)?;

    let daily = dir.join(format!("daily_operations_{stem}.csv"));
    write_daily_csv(create(&daily)?, &result.daily_breakdown)?;

    let equipment = dir.join(format!("equipment_{stem}.csv"));
    write_equipment_csv(create(&equipment)?, &result.equipment_usage)?;

    let written = vec![analysis, report, daily, equipment];
    info!(dir = %dir.display(), files = written.len(), "Exports written");
    Ok(written)
}
