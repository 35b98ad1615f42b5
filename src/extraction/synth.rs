//! Placeholder synthesis
//!
//! All fabricated values are produced here so that extraction code only
//! decides *when* to synthesize, never *what*. Only drill times are random;
//! the RNG is seedable through `[synthesis] seed` for reproducible runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::defaults::{BASE_DEPLOYMENT_HOURS, DEPLOYMENT_HOURS_PER_TOOL};
use crate::config::{ActivityConfig, SynthesisConfig, ValueRange};
use crate::types::DrillKind;

/// Success rate given to synthesized tools whose number is a multiple of this.
const DEGRADED_TOOL_EVERY: u32 = 3;

/// Random and deterministic placeholder generator for one analysis run.
#[derive(Debug)]
pub struct Synthesizer {
    rng: StdRng,
    config: SynthesisConfig,
}

impl Synthesizer {
    pub fn new(config: &SynthesisConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            config: config.clone(),
        }
    }

    /// Operation count used when a drill sheet is present but has no rows.
    pub fn nominal_count(&self, kind: DrillKind) -> u32 {
        match kind {
            DrillKind::Mill => self.config.nominal_mill_plugs,
            DrillKind::CoiledTubing => self.config.nominal_ct_operations,
        }
    }

    /// Drill time sampled uniformly from the configured range, 0.1 min resolution.
    pub fn drill_time(&mut self, kind: DrillKind) -> f64 {
        let range = match kind {
            DrillKind::Mill => self.config.mill_drill_time_mins,
            DrillKind::CoiledTubing => self.config.ct_drill_time_mins,
        };
        round1(self.sample(range))
    }

    /// Tag depth of the n-th plug, stepping up-hole from the configured top.
    pub fn tag_depth(&self, kind: DrillKind, plug: u32) -> f64 {
        let top = match kind {
            DrillKind::Mill => self.config.mill_top_depth_ft,
            DrillKind::CoiledTubing => self.config.ct_top_depth_ft,
        };
        top - self.config.plug_depth_step_ft * f64::from(plug.saturating_sub(1))
    }

    /// Distance between tag depth and set depth for synthesized rows.
    pub fn depth_offset(&self, kind: DrillKind) -> f64 {
        match kind {
            DrillKind::Mill => self.config.mill_depth_offset_ft,
            DrillKind::CoiledTubing => self.config.ct_depth_offset_ft,
        }
    }

    fn sample(&mut self, range: ValueRange) -> f64 {
        if range.low >= range.high {
            return range.low;
        }
        self.rng.gen_range(range.low..=range.high)
    }
}

/// Work hours estimated from the activity count.
pub fn work_hours(activities: u32, config: &ActivityConfig) -> f64 {
    round1(f64::from(activities) * config.hours_per_activity)
}

/// Downtime estimated from the activity count, never negative.
pub fn downtime(activities: u32, config: &ActivityConfig) -> f64 {
    round1((config.base_downtime_hours - config.downtime_per_activity * f64::from(activities)).max(0.0))
}

/// Tool pair assumed in use on a day with no recorded equipment.
pub fn day_equipment(prefix: &str, day: u32) -> Vec<String> {
    vec![format!("{prefix}{day}"), format!("{prefix}{}", day + 1)]
}

/// Success rate assumed for a tool sheet without a status.
pub fn tool_success_rate(tool: u32) -> f64 {
    if tool % DEGRADED_TOOL_EVERY == 0 {
        50.0
    } else {
        100.0
    }
}

/// Deployment duration assumed for a tool sheet without timestamps (hours).
pub fn tool_deployment_hours(tool: u32) -> f64 {
    round1(BASE_DEPLOYMENT_HOURS + DEPLOYMENT_HOURS_PER_TOOL * f64::from(tool))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> Synthesizer {
        Synthesizer::new(&SynthesisConfig {
            seed: Some(seed),
            ..SynthesisConfig::default()
        })
    }

    #[test]
    fn test_drill_times_stay_in_range() {
        let mut synth = seeded(7);
        for _ in 0..200 {
            let mill = synth.drill_time(DrillKind::Mill);
            assert!((35.0..=50.0).contains(&mill), "mill {mill}");
            let ct = synth.drill_time(DrillKind::CoiledTubing);
            assert!((28.0..=36.0).contains(&ct), "ct {ct}");
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        let xs: Vec<f64> = (0..10).map(|_| a.drill_time(DrillKind::Mill)).collect();
        let ys: Vec<f64> = (0..10).map(|_| b.drill_time(DrillKind::Mill)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_degenerate_range_returns_low() {
        let mut synth = Synthesizer::new(&SynthesisConfig {
            seed: Some(1),
            mill_drill_time_mins: ValueRange::new(40.0, 40.0),
            ..SynthesisConfig::default()
        });
        assert!((synth.drill_time(DrillKind::Mill) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_depth_sequence() {
        let synth = seeded(0);
        assert!((synth.tag_depth(DrillKind::Mill, 1) - 5247.0).abs() < 1e-9);
        assert!((synth.tag_depth(DrillKind::Mill, 3) - 5137.0).abs() < 1e-9);
        assert!((synth.tag_depth(DrillKind::CoiledTubing, 2) - 4638.0).abs() < 1e-9);
        assert_eq!(synth.nominal_count(DrillKind::Mill), 10);
        assert_eq!(synth.nominal_count(DrillKind::CoiledTubing), 5);
    }

    #[test]
    fn test_daily_estimates() {
        let cfg = ActivityConfig::default();
        assert!((work_hours(10, &cfg) - 12.0).abs() < 1e-9);
        assert!((downtime(10, &cfg) - 1.0).abs() < 1e-9);
        assert!(downtime(15, &cfg).abs() < 1e-9);
        assert_eq!(day_equipment("FT", 3), vec!["FT3", "FT4"]);
    }

    #[test]
    fn test_tool_placeholders() {
        assert!((tool_success_rate(3) - 50.0).abs() < f64::EPSILON);
        assert!((tool_success_rate(4) - 100.0).abs() < f64::EPSILON);
        assert!((tool_deployment_hours(5) - 3.5).abs() < 1e-9);
    }
}
