//! Shared data structures for drillout field analysis
//!
//! This module defines the core types handed between the extraction,
//! metrics and advisory stages:
//! - Job metadata (`General Info` sheet)
//! - Daily operations (`SP` service-plan sheets)
//! - Equipment usage (`FT` tool sheets)
//! - Drill operations (`Mill Data` / `CT Milling` sheets)
//! - Derived metric groups and the root `AnalysisResult`

mod job;
mod operations;
mod equipment;
mod metrics;
mod advisory;
mod analysis;

pub use job::*;
pub use operations::*;
pub use equipment::*;
pub use metrics::*;
pub use advisory::*;
pub use analysis::*;
pub(crate) use advisory::recommendation_list;
pub(crate) use analysis::metric_group;
