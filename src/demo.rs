//! Canned demo dataset
//!
//! Serves two roles: per-section defaults when a sheet is missing, and the
//! whole-analysis fallback when a workbook cannot be read at all. The demo
//! result is computed from these records by the regular metrics pipeline,
//! so its aggregates are always consistent with its raw data.

use chrono::{NaiveDate, NaiveTime};

use crate::assembler::Sections;
use crate::config::AnalysisConfig;
use crate::types::{
    AnalysisResult, DailyOperationRecord, DataSource, DrillOperation, EquipmentRecord,
    EquipmentUsage, ExtractionNote, JobField, JobRecord, ToolId, DEFAULT_DURATION_DAYS,
};

const ALL_JOB_FIELDS: [JobField; 12] = [
    JobField::CustomerName,
    JobField::TicketNumber,
    JobField::JobType,
    JobField::WellNumber,
    JobField::Lease,
    JobField::County,
    JobField::RigName,
    JobField::AfePo,
    JobField::DateStarted,
    JobField::DateEnded,
    JobField::DaySupervisor,
    JobField::NightSupervisor,
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn time(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

// ============================================================================
// Job
// ============================================================================

/// Demo job metadata.
pub fn job_record() -> JobRecord {
    JobRecord {
        customer_name: "Apex Energy Corp".to_string(),
        ticket_number: "AEC-2024-0892".to_string(),
        job_type: "Drillout Operation".to_string(),
        well_number: "Well #AE-47".to_string(),
        lease: "Apex 47 Unit".to_string(),
        county: "Permian County".to_string(),
        rig_name: "Rig Alpha-7".to_string(),
        afe_po: "AFE-24-0892".to_string(),
        date_started: date(2024, 6, 15),
        date_ended: date(2024, 6, 21),
        day_supervisor: "Mike Johnson".to_string(),
        night_supervisor: "Carlos Rivera".to_string(),
        duration_days: DEFAULT_DURATION_DAYS,
        defaulted_fields: Vec::new(),
    }
}

/// Job record used when the `General Info` sheet is unavailable.
///
/// Every field carries its placeholder and is listed as defaulted.
pub fn section_default_job() -> JobRecord {
    let text = |f: JobField| f.placeholder().to_string();
    let placeholder_date = |f: JobField| {
        NaiveDate::parse_from_str(f.placeholder(), "%Y-%m-%d").unwrap_or_default()
    };
    JobRecord {
        customer_name: text(JobField::CustomerName),
        ticket_number: text(JobField::TicketNumber),
        job_type: text(JobField::JobType),
        well_number: text(JobField::WellNumber),
        lease: text(JobField::Lease),
        county: text(JobField::County),
        rig_name: text(JobField::RigName),
        afe_po: text(JobField::AfePo),
        date_started: placeholder_date(JobField::DateStarted),
        date_ended: placeholder_date(JobField::DateEnded),
        day_supervisor: text(JobField::DaySupervisor),
        night_supervisor: text(JobField::NightSupervisor),
        duration_days: DEFAULT_DURATION_DAYS,
        defaulted_fields: ALL_JOB_FIELDS.to_vec(),
    }
}

// ============================================================================
// Daily Operations
// ============================================================================

/// Seven demo days, 2024-06-15 through 2024-06-21.
pub fn daily_operations() -> Vec<DailyOperationRecord> {
    // (activities, work hours, downtime, equipment, mill plugs, CT operations)
    let rows: [(u32, f64, f64, &[&str], u32, u32); 7] = [
        (8, 9.5, 1.5, &["FT1", "FT2"], 2, 0),
        (12, 12.0, 0.5, &["FT2", "FT3", "FT4"], 3, 0),
        (15, 14.5, 2.0, &["FT3", "FT5", "FT6"], 3, 0),
        (11, 11.5, 1.0, &["FT4", "FT7"], 2, 1),
        (9, 10.0, 1.5, &["FT5", "FT8"], 0, 2),
        (7, 8.5, 1.0, &["FT6"], 0, 2),
        (6, 6.5, 1.0, &["FT7"], 0, 0),
    ];

    rows.iter()
        .zip(1u32..)
        .map(|(&(activities, work_hours, downtime, equipment, mill, ct), day)| {
            DailyOperationRecord {
                day,
                date: date(2024, 6, 14 + day),
                activities,
                work_hours,
                downtime,
                equipment: equipment.iter().map(|s| (*s).to_string()).collect(),
                mill_operations: Some(mill),
                ct_operations: Some(ct),
                synthesized_fields: Vec::new(),
            }
        })
        .collect()
}

// ============================================================================
// Equipment
// ============================================================================

/// Eight demo tools; FT3 (worn) and FT6 (damaged) are flagged.
pub fn equipment_usage() -> EquipmentUsage {
    // (tool type, usage, success rate, deployment hours)
    let rows: [(&str, u32, f64, f64); 8] = [
        ("Overshot", 1, 100.0, 2.5),
        ("Spear", 2, 100.0, 3.0),
        ("Mill Bit #1", 2, 50.0, 4.5),
        ("Mill Bit #2", 2, 100.0, 2.0),
        ("Junk Basket", 2, 100.0, 3.5),
        ("Washover Pipe", 2, 50.0, 5.0),
        ("Taper Tap", 2, 100.0, 1.5),
        ("Die Collar", 1, 100.0, 2.0),
    ];

    rows.iter()
        .zip(1u32..)
        .map(|(&(tool_type, usage_count, success_rate, hours), n)| {
            (
                ToolId::new("FT", n),
                EquipmentRecord {
                    tool_type: tool_type.to_string(),
                    usage_count,
                    success_rate,
                    avg_deployment_time: hours,
                    maintenance_due: success_rate < 100.0,
                    synthesized_fields: Vec::new(),
                },
            )
        })
        .collect()
}

// ============================================================================
// Drill Operations
// ============================================================================

/// Ten demo mill plugs, 3 ft delta each.
pub fn mill_operations() -> Vec<DrillOperation> {
    // (tag time, tag depth, drill time, torque, pressure)
    let rows: [((u32, u32), f64, f64, f64, f64); 10] = [
        ((8, 30), 5247.0, 45.0, 450.0, 1200.0),
        ((10, 15), 5189.0, 38.0, 420.0, 1150.0),
        ((12, 45), 5134.0, 52.0, 480.0, 1250.0),
        ((14, 20), 5076.0, 41.0, 435.0, 1180.0),
        ((16, 10), 5021.0, 47.0, 465.0, 1220.0),
        ((8, 45), 4967.0, 39.0, 410.0, 1160.0),
        ((11, 30), 4912.0, 44.0, 445.0, 1190.0),
        ((13, 15), 4858.0, 36.0, 390.0, 1140.0),
        ((15, 40), 4803.0, 49.0, 470.0, 1230.0),
        ((17, 25), 4749.0, 43.0, 440.0, 1200.0),
    ];

    rows.iter()
        .zip(1u32..)
        .map(|(&((h, m), tag_depth, drill_time, torque, pressure), plug)| DrillOperation {
            plug_number: plug,
            tag_time: time(h, m),
            tag_depth,
            drill_time_mins: drill_time,
            actual_depth: tag_depth + 3.0,
            depth_delta: 3.0,
            torque: Some(torque),
            pressure_psi: Some(pressure),
            success: true,
            synthesized_fields: Vec::new(),
        })
        .collect()
}

/// Five demo coiled-tubing operations, 2 ft delta each.
pub fn ct_operations() -> Vec<DrillOperation> {
    // (tag time, tag depth, drill time)
    let rows: [((u32, u32), f64, f64); 5] = [
        ((9, 15), 4693.0, 32.0),
        ((11, 45), 4638.0, 29.0),
        ((14, 30), 4583.0, 35.0),
        ((16, 20), 4528.0, 31.0),
        ((18, 10), 4473.0, 28.0),
    ];

    rows.iter()
        .zip(1u32..)
        .map(|(&((h, m), tag_depth, drill_time), plug)| DrillOperation {
            plug_number: plug,
            tag_time: time(h, m),
            tag_depth,
            drill_time_mins: drill_time,
            actual_depth: tag_depth + 2.0,
            depth_delta: 2.0,
            torque: None,
            pressure_psi: None,
            success: true,
            synthesized_fields: Vec::new(),
        })
        .collect()
}

// ============================================================================
// Full Result
// ============================================================================

/// Raw demo sections, ready for analysis.
pub fn sections() -> Sections {
    Sections {
        job: job_record(),
        daily: daily_operations(),
        equipment: equipment_usage(),
        mill: mill_operations(),
        ct: ct_operations(),
        notes: Vec::new(),
    }
}

/// Complete demo analysis, tagged `data_source = demo`.
pub fn analysis(config: &AnalysisConfig) -> AnalysisResult {
    sections().analyze(config, DataSource::Demo)
}

/// Demo analysis carrying the note that explains the fallback.
pub fn fallback(config: &AnalysisConfig, note: ExtractionNote) -> AnalysisResult {
    let mut result = analysis(config);
    result.extraction_notes.push(note);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn test_demo_totals() {
        let days = daily_operations();
        assert_eq!(days.iter().map(|d| d.activities).sum::<u32>(), 68);
        assert!((days.iter().map(|d| d.work_hours).sum::<f64>() - 72.5).abs() < 1e-9);
        assert_eq!(days.iter().filter_map(|d| d.mill_operations).sum::<u32>(), 10);
        assert_eq!(days.iter().filter_map(|d| d.ct_operations).sum::<u32>(), 5);
        assert_eq!(days.last().map(|d| d.date), Some(date(2024, 6, 21)));
    }

    #[test]
    fn test_demo_analysis_is_consistent() {
        let result = analysis(&AnalysisConfig::default());
        assert!(result.is_demo());

        let ops = result.operational_frequency.as_ref().expect("operational");
        assert_eq!(ops.total_activities, 68);
        assert!((ops.avg_activities_per_day - 9.7).abs() < 1e-9);
        assert_eq!(ops.peak_activity_day, 3);

        let eq = result.equipment_frequency.as_ref().expect("equipment");
        assert_eq!(eq.total_tools_deployed, 8);
        assert!((eq.deployment_success_rate - 75.0).abs() < 1e-9);
        assert_eq!(eq.tools_due_for_maintenance, vec!["FT3", "FT6"]);

        let time = result.time_analysis.as_ref().expect("time");
        assert!((time.downtime_percentage - 11.72).abs() < 1e-9);

        let mill = result.mill_performance.as_ref().expect("mill");
        assert_eq!(mill.total_plugs_drilled, 10);
        assert!((mill.total_footage - 30.0).abs() < 1e-9);
        assert!((mill.avg_drill_time_mins - 43.4).abs() < 1e-9);

        let ct = result.ct_performance.as_ref().expect("ct");
        assert!((ct.depth_accuracy - 100.0).abs() < 1e-9);
        assert!((ct.avg_ct_drill_time - 31.0).abs() < 1e-9);

        assert_eq!(
            result.recommendations.last().map(|r| r.severity),
            Some(Severity::Safety)
        );
    }

    #[test]
    fn test_section_default_job_is_fully_defaulted() {
        let job = section_default_job();
        assert_eq!(job.defaulted_fields.len(), 12);
        assert_eq!(job.ticket_number, "EXT-2024-001");
        assert_eq!(job.duration_days, 7);
    }
}
