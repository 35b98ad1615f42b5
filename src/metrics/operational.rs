//! Operational frequency and time patterns over daily records

use std::collections::HashMap;

use super::{ratio, round_to};
use crate::types::{DailyOperationRecord, OperationalFrequency, TimeAnalysis};

/// Activity and work-hour totals across the job.
///
/// ## Returns
/// `None` for an empty day list. The peak activity day is the *first* day
/// reaching the maximum activity count, so ties resolve to the earlier day.
pub fn operational_frequency(days: &[DailyOperationRecord]) -> Option<OperationalFrequency> {
    let first = days.first()?;

    let total_activities: u32 = days.iter().map(|d| d.activities).sum();
    let total_work_hours: f64 = days.iter().map(|d| d.work_hours).sum();
    #[allow(clippy::cast_precision_loss)]
    let n = days.len() as f64;

    // Explicit fold: max_by_key returns the last maximum
    let peak = days.iter().fold(first, |best, d| {
        if d.activities > best.activities {
            d
        } else {
            best
        }
    });

    Some(OperationalFrequency {
        total_operational_days: days.len(),
        total_activities,
        avg_activities_per_day: round_to(f64::from(total_activities) / n, 1),
        total_work_hours: round_to(total_work_hours, 2),
        avg_hours_per_day: round_to(total_work_hours / n, 2),
        peak_activity_day: peak.day,
        most_common_equipment: most_common_equipment(days),
    })
}

/// Most frequent equipment identifier; ties go to the first one mentioned.
fn most_common_equipment(days: &[DailyOperationRecord]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (order, id) in days.iter().flat_map(|d| d.equipment.iter()).enumerate() {
        counts.entry(id.as_str()).or_insert((0, order)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, oa)), (_, (cb, ob))| ca.cmp(cb).then_with(|| ob.cmp(oa)))
        .map(|(id, _)| id.to_string())
}

/// Work-hour spread and downtime share.
///
/// Average, maximum and minimum consider only days with positive hours;
/// downtime sums over every day.
pub fn time_analysis(days: &[DailyOperationRecord]) -> Option<TimeAnalysis> {
    if days.is_empty() {
        return None;
    }

    let worked: Vec<f64> = days
        .iter()
        .map(|d| d.work_hours)
        .filter(|h| *h > 0.0)
        .collect();
    let total_hours: f64 = worked.iter().sum();
    let total_downtime: f64 = days.iter().map(|d| d.downtime).sum();

    #[allow(clippy::cast_precision_loss)]
    let avg = ratio(total_hours, worked.len() as f64);
    let max = worked.iter().copied().fold(None, |m: Option<f64>, h| Some(m.map_or(h, |m| m.max(h))));
    let min = worked.iter().copied().fold(None, |m: Option<f64>, h| Some(m.map_or(h, |m| m.min(h))));

    Some(TimeAnalysis {
        avg_daily_hours: round_to(avg, 2),
        max_daily_hours: round_to(max.unwrap_or(0.0), 2),
        min_daily_hours: round_to(min.unwrap_or(0.0), 2),
        total_downtime: round_to(total_downtime, 2),
        downtime_percentage: round_to(ratio(total_downtime, total_hours) * 100.0, 2),
    })
}
