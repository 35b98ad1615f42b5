//! Derived aggregates over extracted records
//!
//! Every function here is pure and total: empty input yields `None`, which
//! the result serializes as an empty `{}` group, and every division is
//! guarded to return 0.

mod drilling;
mod equipment;
mod operational;

pub use drilling::{ct_performance, efficiency_metrics, mill_performance};
pub use equipment::{equipment_frequency, performance_bucket};
pub use operational::{operational_frequency, time_analysis};

/// Round to `places` decimal places, half away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
