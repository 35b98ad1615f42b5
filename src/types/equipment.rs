//! Equipment (tool sheet) records

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Tool identifier such as `FT3`.
///
/// Orders by prefix then by numeric suffix so `FT2` sorts before `FT10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(String);

impl ToolId {
    pub fn new(prefix: &str, number: u32) -> Self {
        Self(format!("{prefix}{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing numeric suffix, if any.
    pub fn number(&self) -> Option<u32> {
        let digits_at = self.0.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        self.0[digits_at..].parse().ok()
    }

    fn prefix(&self) -> &str {
        self.0.trim_end_matches(|c: char| c.is_ascii_digit())
    }
}

impl From<&str> for ToolId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for ToolId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.prefix()
            .cmp(other.prefix())
            .then_with(|| self.number().cmp(&other.number()))
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ToolId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Equipment record fields that may be synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentField {
    ToolType,
    SuccessRate,
    DeploymentTime,
}

/// Deployment summary for a single fishing/milling tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub tool_type: String,
    pub usage_count: u32,
    /// Success rate (0-100)
    pub success_rate: f64,
    /// Average deployment duration (hours)
    pub avg_deployment_time: f64,
    pub maintenance_due: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synthesized_fields: Vec<EquipmentField>,
}

/// One entry per distinct tool; absent tools are simply missing.
pub type EquipmentUsage = BTreeMap<ToolId, EquipmentRecord>;
