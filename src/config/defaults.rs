//! System-wide default constants.
//!
//! Centralises the magic numbers used by extraction, synthesis and metrics.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Workbook Layout
// ============================================================================

/// Sheet holding job identification and customer data.
pub const GENERAL_INFO_SHEET: &str = "General Info";

/// Sheet holding per-plug mill drilling data.
pub const MILL_SHEET: &str = "Mill Data";

/// Sheet holding coiled-tubing milling data.
pub const CT_SHEET: &str = "CT Milling";

/// Prefix of the per-day service-plan sheets (`SP1`, `SP2`, ...).
pub const DAY_SHEET_PREFIX: &str = "SP";

/// Number of day sheets in the field tool kit.
pub const DAY_SHEET_COUNT: u32 = 10;

/// Prefix of the per-tool sheets (`FT1`, `FT2`, ...).
pub const TOOL_SHEET_PREFIX: &str = "FT";

/// Nominal maximum tool-sheet count; also the equipment utilization denominator.
pub const TOOL_SHEET_COUNT: u32 = 15;

/// Maximum coiled-tubing rows scanned below the header.
pub const CT_MAX_ROWS: u32 = 20;

/// Upper bound on workbook parsing before the demo fallback kicks in (seconds).
pub const PARSE_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Equipment Performance Buckets
// ============================================================================

/// Drillout profile: success rate at or above this is "excellent".
pub const DRILLOUT_EXCELLENT_SUCCESS_RATE: f64 = 95.0;

/// Drillout profile: success rate at or above this is "good".
pub const DRILLOUT_GOOD_SUCCESS_RATE: f64 = 85.0;

/// Fishing profile: success rate at or above this is "excellent".
pub const FISHING_EXCELLENT_SUCCESS_RATE: f64 = 90.0;

/// Fishing profile: success rate at or above this is "good".
pub const FISHING_GOOD_SUCCESS_RATE: f64 = 70.0;

// ============================================================================
// Drilling Performance
// ============================================================================

/// Mill average drill time below this earns the "High" rating (minutes).
pub const MILL_FAST_DRILL_TIME_MINS: f64 = 45.0;

/// CT average drill time below this earns the "Excellent" rating (minutes).
pub const CT_FAST_DRILL_TIME_MINS: f64 = 40.0;

/// Drill operations longer than this are flagged unsuccessful (minutes).
pub const MAX_SUCCESSFUL_DRILL_TIME_MINS: f64 = 90.0;

/// CT depth delta within this counts toward depth accuracy (ft).
pub const CT_DEPTH_TOLERANCE_FT: f64 = 3.0;

/// Drilling efficiency when the mill average is below the fast threshold (%).
pub const DRILLING_EFFICIENCY_FAST: f64 = 92.0;

/// Drilling efficiency when the mill average is at or above the fast threshold (%).
pub const DRILLING_EFFICIENCY_SLOW: f64 = 85.0;

/// Drilling efficiency when no mill data exists (%).
pub const DRILLING_EFFICIENCY_NO_DATA: f64 = 88.0;

/// Safety score when every mill operation succeeded, or none were recorded.
pub const SAFETY_SCORE_CLEAN: f64 = 98.0;

/// Safety score when at least one mill operation failed.
pub const SAFETY_SCORE_FAILED_OPS: f64 = 95.0;

/// Job completion rate reported for finished jobs (%).
pub const JOB_COMPLETION_RATE: f64 = 100.0;

// ============================================================================
// Activity Counting & Daily Estimates
// ============================================================================

/// Lower clamp for per-day activity counts.
pub const MIN_DAILY_ACTIVITIES: u32 = 1;

/// Upper clamp for per-day activity counts.
pub const MAX_DAILY_ACTIVITIES: u32 = 15;

/// Work hours estimated per activity when the sheet states none.
pub const HOURS_PER_ACTIVITY: f64 = 1.2;

/// Downtime baseline before the per-activity reduction (hours).
pub const BASE_DOWNTIME_HOURS: f64 = 2.0;

/// Downtime reduction per logged activity (hours).
pub const DOWNTIME_PER_ACTIVITY: f64 = 0.1;

// ============================================================================
// Placeholder Synthesis
// ============================================================================

/// Plug count synthesized for a present-but-empty mill sheet.
pub const NOMINAL_MILL_PLUGS: u32 = 10;

/// Operation count synthesized for a present-but-empty CT sheet.
pub const NOMINAL_CT_OPERATIONS: u32 = 5;

/// Mill drill time sampling interval (minutes).
pub const MILL_DRILL_TIME_RANGE: (f64, f64) = (35.0, 50.0);

/// CT drill time sampling interval (minutes).
pub const CT_DRILL_TIME_RANGE: (f64, f64) = (28.0, 36.0);

/// Tag depth of the first synthesized mill plug (ft).
pub const MILL_TOP_DEPTH_FT: f64 = 5247.0;

/// Tag depth of the first synthesized CT operation (ft).
pub const CT_TOP_DEPTH_FT: f64 = 4693.0;

/// Depth decrease between consecutive synthesized plugs (ft).
pub const PLUG_DEPTH_STEP_FT: f64 = 55.0;

/// Synthesized mill set depth sits this far below the tag depth (ft).
pub const MILL_DEPTH_OFFSET_FT: f64 = 3.0;

/// Synthesized CT set depth sits this far below the tag depth (ft).
pub const CT_DEPTH_OFFSET_FT: f64 = 2.0;

/// Base deployment duration for synthesized tool records (hours).
pub const BASE_DEPLOYMENT_HOURS: f64 = 2.0;

/// Deployment duration added per tool number for synthesized records (hours).
pub const DEPLOYMENT_HOURS_PER_TOOL: f64 = 0.3;

// ============================================================================
// Recommendations
// ============================================================================

/// Drilling efficiency above which best-practice sharing is suggested (%).
pub const EFFICIENCY_SHARE_THRESHOLD: f64 = 85.0;

/// Downtime percentage above which an optimization advisory is emitted.
pub const DOWNTIME_WARNING_PERCENT: f64 = 10.0;
