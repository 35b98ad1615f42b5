//! Rule-based recommendation generation
//!
//! Rules run in a fixed order and each either emits one advisory or is
//! skipped. The order groups advisories by theme for display:
//!
//! 1. Drill time (positive below the mill threshold, warning above)
//! 2. Coiled-tubing efficiency
//! 3. Maintenance due (only when tools are flagged)
//! 4. Best-practice sharing (only when drilling efficiency is high)
//! 5. Downtime (only above the configured limit)
//! 6. Safety (always present, always last)
//!
//! Message text keeps the keywords the dashboard styles on: "excellent" and
//! "maintain" for positive items, "maintenance" and "require" for warnings,
//! "efficiency" and "optimize" for efficiency items, "safety" for safety.

use crate::config::AnalysisConfig;
use crate::types::{
    CtPerformance, EfficiencyMetrics, EquipmentFrequency, MillPerformance, Recommendation,
    Severity, TimeAnalysis,
};

/// Metric groups the rules read; any may be absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvisoryInputs<'a> {
    pub mill: Option<&'a MillPerformance>,
    pub ct: Option<&'a CtPerformance>,
    pub equipment: Option<&'a EquipmentFrequency>,
    pub efficiency: Option<&'a EfficiencyMetrics>,
    pub time: Option<&'a TimeAnalysis>,
}

type Rule = fn(&AdvisoryInputs<'_>, &AnalysisConfig) -> Option<Recommendation>;

const RULES: [Rule; 6] = [
    drill_time_rule,
    ct_rule,
    maintenance_rule,
    efficiency_sharing_rule,
    downtime_rule,
    safety_rule,
];

/// Evaluate every rule in order.
pub fn generate_recommendations(
    inputs: &AdvisoryInputs<'_>,
    config: &AnalysisConfig,
) -> Vec<Recommendation> {
    RULES.iter().filter_map(|rule| rule(inputs, config)).collect()
}

fn drill_time_rule(inputs: &AdvisoryInputs<'_>, config: &AnalysisConfig) -> Option<Recommendation> {
    let avg = inputs.mill?.avg_drill_time_mins;
    Some(if avg < config.drilling.mill_fast_drill_time_mins {
        Recommendation::new(
            Severity::Positive,
            format!(
                "Excellent drilling performance with {avg:.1} min average - maintain current operational parameters"
            ),
        )
    } else {
        Recommendation::new(
            Severity::Warning,
            format!(
                "Drill time averaging {avg:.1} min exceeds the {:.0} min target - mill parameters require review",
                config.drilling.mill_fast_drill_time_mins
            ),
        )
    })
}

fn ct_rule(inputs: &AdvisoryInputs<'_>, config: &AnalysisConfig) -> Option<Recommendation> {
    let ct = inputs.ct?;
    let avg = ct.avg_ct_drill_time;
    Some(if avg < config.drilling.ct_fast_drill_time_mins {
        Recommendation::new(
            Severity::Efficiency,
            format!("CT operations showing excellent efficiency ({avg:.1} min avg) - optimize for future jobs"),
        )
    } else {
        Recommendation::new(
            Severity::Efficiency,
            format!(
                "CT drill time averaging {avg:.1} min - optimize coiled tubing parameters to improve efficiency"
            ),
        )
    })
}

fn maintenance_rule(inputs: &AdvisoryInputs<'_>, _config: &AnalysisConfig) -> Option<Recommendation> {
    let due = &inputs.equipment?.tools_due_for_maintenance;
    if due.is_empty() {
        return None;
    }
    let (noun, verb) = if due.len() == 1 { ("tool", "requires") } else { ("tools", "require") };
    Some(Recommendation::new(
        Severity::Warning,
        format!(
            "{} {noun} ({}) {verb} maintenance review before next deployment",
            due.len(),
            due.join(", ")
        ),
    ))
}

fn efficiency_sharing_rule(inputs: &AdvisoryInputs<'_>, config: &AnalysisConfig) -> Option<Recommendation> {
    let efficiency = inputs.efficiency?.drilling_efficiency;
    (efficiency > config.recommendations.efficiency_share_threshold).then(|| {
        Recommendation::new(
            Severity::Efficiency,
            format!(
                "High drilling efficiency achieved ({efficiency:.0}%) - consider sharing best practices with other crews"
            ),
        )
    })
}

fn downtime_rule(inputs: &AdvisoryInputs<'_>, config: &AnalysisConfig) -> Option<Recommendation> {
    let pct = inputs.time?.downtime_percentage;
    (pct > config.recommendations.downtime_warning_percent).then(|| {
        Recommendation::new(
            Severity::Warning,
            format!(
                "Downtime at {pct:.1}% of work hours exceeds the {:.0}% limit - optimize rig-up and tool change sequences",
                config.recommendations.downtime_warning_percent
            ),
        )
    })
}

fn safety_rule(_inputs: &AdvisoryInputs<'_>, _config: &AnalysisConfig) -> Option<Recommendation> {
    Some(Recommendation::new(
        Severity::Safety,
        "Maintain excellent safety record with continued JSA compliance and observation protocols",
    ))
}
