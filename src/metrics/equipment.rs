//! Equipment frequency over tool records

use std::collections::BTreeMap;

use super::{ratio, round_to};
use crate::config::EquipmentThresholds;
use crate::types::{EquipmentFrequency, EquipmentUsage, PerformanceBucket};

/// Bucket a tool's success rate against the configured thresholds.
pub fn performance_bucket(success_rate: f64, thresholds: &EquipmentThresholds) -> PerformanceBucket {
    if success_rate >= thresholds.excellent_success_rate {
        PerformanceBucket::Excellent
    } else if success_rate >= thresholds.good_success_rate {
        PerformanceBucket::Good
    } else {
        PerformanceBucket::Poor
    }
}

/// Deployment counts, issue counts and the performance distribution.
///
/// A tool "has issues" when its success rate is below 100. The deployment
/// success rate is the share of issue-free tools, in percent.
pub fn equipment_frequency(
    usage: &EquipmentUsage,
    thresholds: &EquipmentThresholds,
) -> Option<EquipmentFrequency> {
    if usage.is_empty() {
        return None;
    }

    let deployed = usage.len();
    let with_issues = usage.values().filter(|r| r.success_rate < 100.0).count();

    let mut distribution = BTreeMap::new();
    for record in usage.values() {
        *distribution
            .entry(performance_bucket(record.success_rate, thresholds))
            .or_insert(0) += 1;
    }

    // Type with the highest summed usage; ties keep the lowest tool number
    let mut by_type: Vec<(&str, u32)> = Vec::new();
    for record in usage.values() {
        match by_type.iter_mut().find(|(t, _)| *t == record.tool_type) {
            Some((_, n)) => *n += record.usage_count,
            None => by_type.push((record.tool_type.as_str(), record.usage_count)),
        }
    }
    let most_used_tool_type = by_type
        .iter()
        .fold(None::<(&str, u32)>, |best, &(t, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((t, n)),
        })
        .map(|(t, _)| t.to_string());

    #[allow(clippy::cast_precision_loss)]
    let success = ratio((deployed - with_issues) as f64, deployed as f64) * 100.0;

    Some(EquipmentFrequency {
        total_tools_deployed: deployed,
        tools_with_issues: with_issues,
        performance_distribution: distribution,
        most_used_tool_type,
        deployment_success_rate: round_to(success, 2),
        tools_due_for_maintenance: usage
            .iter()
            .filter(|(_, r)| r.maintenance_due)
            .map(|(id, _)| id.to_string())
            .collect(),
    })
}
