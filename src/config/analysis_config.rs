//! Analysis Configuration - Sheet layout, thresholds and synthesis ranges as TOML values
//!
//! Every tunable that drives extraction or metrics is a field in this module.
//! Each struct implements `Default` with values from [`super::defaults`],
//! ensuring zero-change behavior when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use std::fmt;
use tracing::{debug, info, warn};

use super::defaults;

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV_VAR: &str = "DRILLOUT_CONFIG";

/// Config file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "drillout_config.toml";

/// Where the effective configuration was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine(PathBuf),
    Environment(PathBuf),
    WorkingDir(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::CommandLine(p) | Self::Environment(p) | Self::WorkingDir(p) => Some(p),
            Self::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandLine(p) => write!(f, "--config {}", p.display()),
            Self::Environment(p) => write!(f, "${CONFIG_ENV_VAR} ({})", p.display()),
            Self::WorkingDir(p) => write!(f, "{}", p.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one analysis run.
///
/// Resolved by [`AnalysisConfig::resolve`]: CLI path, `$DRILLOUT_CONFIG`,
/// `./drillout_config.toml`, then built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Sheet names and enumeration patterns
    #[serde(default)]
    pub workbook: WorkbookConfig,

    /// Equipment performance buckets
    #[serde(default)]
    pub equipment: EquipmentThresholds,

    /// Mill / CT performance thresholds
    #[serde(default)]
    pub drilling: DrillingConfig,

    /// Placeholder synthesis for sparse sheets
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Activity counting and daily estimates
    #[serde(default)]
    pub activity: ActivityConfig,

    /// Advisory rule thresholds
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

impl AnalysisConfig {
    /// Effective configuration for one run, plus where it came from.
    ///
    /// Search order:
    /// 1. `explicit` (the CLI `--config` path). Any failure here is an
    ///    error, since the caller named the file.
    /// 2. `$DRILLOUT_CONFIG`, skipped with a warning when missing or invalid
    /// 3. `./drillout_config.toml`, skipped with a warning when invalid
    /// 4. Built-in defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            return Ok((config, ConfigSource::CommandLine(path.to_path_buf())));
        }
        Ok(Self::search(
            std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            Path::new(LOCAL_CONFIG_FILE),
        ))
    }

    /// Same as [`AnalysisConfig::resolve`] without an explicit path; never fails.
    pub fn load() -> Self {
        Self::search(
            std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
            Path::new(LOCAL_CONFIG_FILE),
        )
        .0
    }

    /// Walk the implicit candidates: env path, then the working-directory file.
    fn search(env_path: Option<PathBuf>, local: &Path) -> (Self, ConfigSource) {
        let candidates = env_path
            .map(ConfigSource::Environment)
            .into_iter()
            .chain(std::iter::once(ConfigSource::WorkingDir(local.to_path_buf())));

        for source in candidates {
            let Some(path) = source.path() else { continue };
            if !path.exists() {
                if matches!(source, ConfigSource::Environment(_)) {
                    warn!(path = %path.display(), "{} points to a missing file, skipped", CONFIG_ENV_VAR);
                }
                continue;
            }
            match Self::load_from_file(path) {
                Ok(config) => {
                    info!(source = %source, "Analysis config loaded");
                    return (config, source);
                }
                Err(e) => warn!(source = %source, error = %e, "Config skipped"),
            }
        }

        debug!("No config file found, using built-in defaults");
        (Self::default(), ConfigSource::Defaults)
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - "excellent" bucket threshold must be >= "good"
    /// - Sampling ranges must satisfy low <= high
    /// - Activity clamp must satisfy min <= max
    /// - Sheet counts and nominal synthesis counts must be > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let eq = &self.equipment;
        Self::check_escalation(
            eq.good_success_rate,
            eq.excellent_success_rate,
            "equipment.success_rate",
            &mut errors,
        );
        for (name, rate) in [
            ("equipment.good_success_rate", eq.good_success_rate),
            ("equipment.excellent_success_rate", eq.excellent_success_rate),
        ] {
            if !(0.0..=100.0).contains(&rate) {
                errors.push(format!("{name} ({rate:.1}) must be within 0-100"));
            }
        }

        let s = &self.synthesis;
        s.mill_drill_time_mins
            .check("synthesis.mill_drill_time_mins", &mut errors);
        s.ct_drill_time_mins
            .check("synthesis.ct_drill_time_mins", &mut errors);
        if s.nominal_mill_plugs == 0 {
            errors.push("synthesis.nominal_mill_plugs must be > 0".to_string());
        }
        if s.nominal_ct_operations == 0 {
            errors.push("synthesis.nominal_ct_operations must be > 0".to_string());
        }
        if s.plug_depth_step_ft < 0.0 {
            errors.push(format!(
                "synthesis.plug_depth_step_ft ({:.1}) must be >= 0 so depth decreases with plug index",
                s.plug_depth_step_ft
            ));
        }

        let a = &self.activity;
        if a.min_activities > a.max_activities {
            errors.push(format!(
                "activity.min_activities ({}) must be <= max_activities ({})",
                a.min_activities, a.max_activities
            ));
        }

        let w = &self.workbook;
        if w.day_sheet_count == 0 {
            errors.push("workbook.day_sheet_count must be > 0".to_string());
        }
        if w.tool_sheet_count == 0 {
            errors.push("workbook.tool_sheet_count must be > 0".to_string());
        }
        if w.parse_timeout_secs == 0 {
            errors.push("workbook.parse_timeout_secs must be > 0".to_string());
        }

        let d = &self.drilling;
        for (name, value) in [
            ("drilling.mill_fast_drill_time_mins", d.mill_fast_drill_time_mins),
            ("drilling.ct_fast_drill_time_mins", d.ct_fast_drill_time_mins),
            ("drilling.max_successful_drill_time_mins", d.max_successful_drill_time_mins),
        ] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("{name} ({value}) must be a positive number"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_escalation(lower: f64, upper: f64, name: &str, errors: &mut Vec<String>) {
        // NaN/Inf comparisons silently pass, catch them explicitly
        if !lower.is_finite() || !upper.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got lower={lower}, upper={upper})"
            ));
            return;
        }
        if upper < lower {
            errors.push(format!(
                "{name}: upper tier ({upper:.3}) must be >= lower tier ({lower:.3})"
            ));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Workbook Layout
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    pub general_info_sheet: String,
    pub mill_sheet: String,
    pub ct_sheet: String,
    /// Day sheets are `{prefix}1..={count}`
    pub day_sheet_prefix: String,
    pub day_sheet_count: u32,
    /// Tool sheets are `{prefix}1..={count}`
    pub tool_sheet_prefix: String,
    pub tool_sheet_count: u32,
    pub ct_max_rows: u32,
    /// Bounded-time guard for workbook parsing (seconds)
    pub parse_timeout_secs: u64,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            general_info_sheet: defaults::GENERAL_INFO_SHEET.to_string(),
            mill_sheet: defaults::MILL_SHEET.to_string(),
            ct_sheet: defaults::CT_SHEET.to_string(),
            day_sheet_prefix: defaults::DAY_SHEET_PREFIX.to_string(),
            day_sheet_count: defaults::DAY_SHEET_COUNT,
            tool_sheet_prefix: defaults::TOOL_SHEET_PREFIX.to_string(),
            tool_sheet_count: defaults::TOOL_SHEET_COUNT,
            ct_max_rows: defaults::CT_MAX_ROWS,
            parse_timeout_secs: defaults::PARSE_TIMEOUT_SECS,
        }
    }
}

impl WorkbookConfig {
    pub fn day_sheet_name(&self, day: u32) -> String {
        format!("{}{}", self.day_sheet_prefix, day)
    }

    pub fn tool_sheet_name(&self, tool: u32) -> String {
        format!("{}{}", self.tool_sheet_prefix, tool)
    }

    pub const fn parse_timeout(&self) -> Duration {
        Duration::from_secs(self.parse_timeout_secs)
    }
}

// ============================================================================
// Equipment Thresholds
// ============================================================================

/// Success-rate bucket boundaries.
///
/// The drillout and fishing tool kits historically used different cut-offs
/// for the same buckets; both are available as named profiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentThresholds {
    pub excellent_success_rate: f64,
    pub good_success_rate: f64,
}

impl Default for EquipmentThresholds {
    fn default() -> Self {
        Self::drillout()
    }
}

impl EquipmentThresholds {
    /// 95 / 85 cut-offs used for drillout jobs.
    pub const fn drillout() -> Self {
        Self {
            excellent_success_rate: defaults::DRILLOUT_EXCELLENT_SUCCESS_RATE,
            good_success_rate: defaults::DRILLOUT_GOOD_SUCCESS_RATE,
        }
    }

    /// 90 / 70 cut-offs used for fishing jobs.
    pub const fn fishing() -> Self {
        Self {
            excellent_success_rate: defaults::FISHING_EXCELLENT_SUCCESS_RATE,
            good_success_rate: defaults::FISHING_GOOD_SUCCESS_RATE,
        }
    }
}

// ============================================================================
// Drilling Performance
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillingConfig {
    pub mill_fast_drill_time_mins: f64,
    pub ct_fast_drill_time_mins: f64,
    pub max_successful_drill_time_mins: f64,
    pub ct_depth_tolerance_ft: f64,
    pub efficiency_fast: f64,
    pub efficiency_slow: f64,
    pub efficiency_no_data: f64,
    pub safety_score_clean: f64,
    pub safety_score_failed_ops: f64,
    pub nominal_tool_count: u32,
}

impl Default for DrillingConfig {
    fn default() -> Self {
        Self {
            mill_fast_drill_time_mins: defaults::MILL_FAST_DRILL_TIME_MINS,
            ct_fast_drill_time_mins: defaults::CT_FAST_DRILL_TIME_MINS,
            max_successful_drill_time_mins: defaults::MAX_SUCCESSFUL_DRILL_TIME_MINS,
            ct_depth_tolerance_ft: defaults::CT_DEPTH_TOLERANCE_FT,
            efficiency_fast: defaults::DRILLING_EFFICIENCY_FAST,
            efficiency_slow: defaults::DRILLING_EFFICIENCY_SLOW,
            efficiency_no_data: defaults::DRILLING_EFFICIENCY_NO_DATA,
            safety_score_clean: defaults::SAFETY_SCORE_CLEAN,
            safety_score_failed_ops: defaults::SAFETY_SCORE_FAILED_OPS,
            nominal_tool_count: defaults::TOOL_SHEET_COUNT,
        }
    }
}

// ============================================================================
// Synthesis
// ============================================================================

/// Inclusive sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }

    fn check(&self, name: &str, errors: &mut Vec<String>) {
        if !self.low.is_finite() || !self.high.is_finite() || self.low > self.high {
            errors.push(format!(
                "{name}: low ({}) must be <= high ({}) and both finite",
                self.low, self.high
            ));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Fixed RNG seed; `None` draws from OS entropy each run
    pub seed: Option<u64>,
    pub nominal_mill_plugs: u32,
    pub nominal_ct_operations: u32,
    pub mill_drill_time_mins: ValueRange,
    pub ct_drill_time_mins: ValueRange,
    pub mill_top_depth_ft: f64,
    pub ct_top_depth_ft: f64,
    pub plug_depth_step_ft: f64,
    pub mill_depth_offset_ft: f64,
    pub ct_depth_offset_ft: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        let (mill_low, mill_high) = defaults::MILL_DRILL_TIME_RANGE;
        let (ct_low, ct_high) = defaults::CT_DRILL_TIME_RANGE;
        Self {
            seed: None,
            nominal_mill_plugs: defaults::NOMINAL_MILL_PLUGS,
            nominal_ct_operations: defaults::NOMINAL_CT_OPERATIONS,
            mill_drill_time_mins: ValueRange::new(mill_low, mill_high),
            ct_drill_time_mins: ValueRange::new(ct_low, ct_high),
            mill_top_depth_ft: defaults::MILL_TOP_DEPTH_FT,
            ct_top_depth_ft: defaults::CT_TOP_DEPTH_FT,
            plug_depth_step_ft: defaults::PLUG_DEPTH_STEP_FT,
            mill_depth_offset_ft: defaults::MILL_DEPTH_OFFSET_FT,
            ct_depth_offset_ft: defaults::CT_DEPTH_OFFSET_FT,
        }
    }
}

// ============================================================================
// Activity
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    pub min_activities: u32,
    pub max_activities: u32,
    pub hours_per_activity: f64,
    pub base_downtime_hours: f64,
    pub downtime_per_activity: f64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            min_activities: defaults::MIN_DAILY_ACTIVITIES,
            max_activities: defaults::MAX_DAILY_ACTIVITIES,
            hours_per_activity: defaults::HOURS_PER_ACTIVITY,
            base_downtime_hours: defaults::BASE_DOWNTIME_HOURS,
            downtime_per_activity: defaults::DOWNTIME_PER_ACTIVITY,
        }
    }
}

// ============================================================================
// Recommendations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub efficiency_share_threshold: f64,
    pub downtime_warning_percent: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            efficiency_share_threshold: defaults::EFFICIENCY_SHARE_THRESHOLD,
            downtime_warning_percent: defaults::DOWNTIME_WARNING_PERCENT,
        }
    }
}
