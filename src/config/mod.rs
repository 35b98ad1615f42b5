//! Analysis Configuration Module
//!
//! Provides per-deployment configuration loaded from TOML files, replacing
//! hardcoded sheet names, thresholds and synthesis ranges with
//! operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `DRILLOUT_CONFIG` environment variable (path to TOML file)
//! 2. `drillout_config.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! ## Usage
//!
//! The config is an explicit value threaded through each analysis run:
//!
//! ```ignore
//! let config = AnalysisConfig::load();
//! let result = assembler::analyze_file(path, &config);
//! ```

mod analysis_config;
pub mod defaults;

pub use analysis_config::*;
