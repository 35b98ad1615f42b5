//! Mill / coiled-tubing performance and job efficiency

use super::{ratio, round_to};
use crate::config::defaults::JOB_COMPLETION_RATE;
use crate::config::DrillingConfig;
use crate::types::{
    CtPerformance, DailyOperationRecord, DrillOperation, EfficiencyMetrics, EquipmentUsage,
    JobRecord, MillPerformance,
};

/// Drill-time statistics shared by both drill sheets.
struct DrillStats {
    count: usize,
    avg: f64,
    min: f64,
    max: f64,
    success_rate: f64,
    synthesized: usize,
}

fn drill_stats(ops: &[DrillOperation]) -> Option<DrillStats> {
    if ops.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = ops.len() as f64;
    let times = ops.iter().map(|op| op.drill_time_mins);
    #[allow(clippy::cast_precision_loss)]
    let successes = ops.iter().filter(|op| op.success).count() as f64;

    Some(DrillStats {
        count: ops.len(),
        avg: times.clone().sum::<f64>() / n,
        min: times.clone().fold(f64::INFINITY, f64::min),
        max: times.fold(f64::NEG_INFINITY, f64::max),
        success_rate: successes / n * 100.0,
        synthesized: ops.iter().filter(|op| op.is_synthesized()).count(),
    })
}

/// Mill drilling summary.
///
/// ## Rating
/// - `High`: average drill time below `mill_fast_drill_time_mins` (45)
/// - `Moderate`: otherwise
pub fn mill_performance(ops: &[DrillOperation], config: &DrillingConfig) -> Option<MillPerformance> {
    let stats = drill_stats(ops)?;
    let footage: f64 = ops.iter().map(|op| op.depth_delta.abs()).sum();
    let avg = round_to(stats.avg, 1);
    let rating = if avg < config.mill_fast_drill_time_mins {
        "High"
    } else {
        "Moderate"
    };

    Some(MillPerformance {
        total_plugs_drilled: stats.count,
        total_footage: round_to(footage, 1),
        avg_drill_time_mins: avg,
        min_drill_time_mins: round_to(stats.min, 1),
        max_drill_time_mins: round_to(stats.max, 1),
        success_rate: round_to(stats.success_rate, 1),
        efficiency_rating: rating.to_string(),
        synthesized_operations: stats.synthesized,
    })
}

/// Coiled-tubing summary.
///
/// Depth accuracy is the share of operations whose |delta| is within
/// `ct_depth_tolerance_ft`. Rated `Excellent` below `ct_fast_drill_time_mins`
/// (40), else `Good`.
pub fn ct_performance(ops: &[DrillOperation], config: &DrillingConfig) -> Option<CtPerformance> {
    let stats = drill_stats(ops)?;
    let accurate = ops
        .iter()
        .filter(|op| op.depth_delta.abs() <= config.ct_depth_tolerance_ft)
        .count();
    let avg = round_to(stats.avg, 1);
    let rating = if avg < config.ct_fast_drill_time_mins {
        "Excellent"
    } else {
        "Good"
    };

    #[allow(clippy::cast_precision_loss)]
    let accuracy = accurate as f64 / stats.count as f64 * 100.0;

    Some(CtPerformance {
        total_ct_operations: stats.count,
        avg_ct_drill_time: avg,
        depth_accuracy: round_to(accuracy, 1),
        success_rate: round_to(stats.success_rate, 1),
        efficiency_rating: rating.to_string(),
        synthesized_operations: stats.synthesized,
    })
}

/// Productivity, utilization and the mill-derived efficiency/safety scores.
///
/// ## Scores
/// | Mill data               | drilling_efficiency | safety_score |
/// |-------------------------|---------------------|--------------|
/// | none                    | 88                  | 98           |
/// | avg < 45 min            | 92                  | 98 / 95      |
/// | avg >= 45 min           | 85                  | 98 / 95      |
///
/// Safety drops to 95 when any mill operation failed.
pub fn efficiency_metrics(
    days: &[DailyOperationRecord],
    job: &JobRecord,
    usage: &EquipmentUsage,
    mill: Option<&MillPerformance>,
    config: &DrillingConfig,
) -> Option<EfficiencyMetrics> {
    if days.is_empty() {
        return None;
    }

    let total_activities: u32 = days.iter().map(|d| d.activities).sum();
    let total_hours: f64 = days.iter().map(|d| d.work_hours).sum();

    let (drilling_efficiency, safety_score) = match mill {
        None => (config.efficiency_no_data, config.safety_score_clean),
        Some(perf) => {
            let efficiency = if perf.avg_drill_time_mins < config.mill_fast_drill_time_mins {
                config.efficiency_fast
            } else {
                config.efficiency_slow
            };
            let safety = if perf.success_rate >= 100.0 {
                config.safety_score_clean
            } else {
                config.safety_score_failed_ops
            };
            (efficiency, safety)
        }
    };

    #[allow(clippy::cast_precision_loss)]
    let utilization = ratio(usage.len() as f64, f64::from(config.nominal_tool_count)) * 100.0;

    Some(EfficiencyMetrics {
        activities_per_hour: round_to(ratio(f64::from(total_activities), total_hours), 2),
        hours_per_day_avg: round_to(ratio(total_hours, f64::from(job.duration_days)), 2),
        job_completion_rate: JOB_COMPLETION_RATE,
        equipment_utilization: round_to(utilization, 2),
        drilling_efficiency,
        safety_score,
    })
}
