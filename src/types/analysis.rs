//! Root analysis result handed to the rendering layer and exports

use serde::{Deserialize, Serialize};

use super::{
    CtPerformance, DailyOperationRecord, EfficiencyMetrics, EquipmentFrequency, EquipmentUsage,
    JobRecord, MillPerformance, OperationalFrequency, Recommendation, TimeAnalysis,
};

/// Whether the result reflects the uploaded workbook or the canned dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Extracted,
    Demo,
}

/// Category of an extraction note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Named sheet absent; the section default was used
    MissingSheet,
    /// Sheet present but unreadable; the section default was used
    MalformedSheet,
    /// Label and fixed coordinate disagree, or only the coordinate matched
    LayoutShift,
    /// A field fell back to its placeholder
    DefaultedField,
    /// Placeholder values were synthesized for sparse rows
    Synthesized,
    /// The whole analysis fell back to the demo dataset
    DemoFallback,
}

/// Informational, non-fatal observation made during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionNote {
    pub kind: NoteKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub message: String,
}

impl ExtractionNote {
    pub fn new(kind: NoteKind, sheet: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            sheet: sheet.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Complete frequency/efficiency analysis of one drillout job.
///
/// Every metric group is always present in the serialized form; a group
/// without source data serializes as an empty mapping `{}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub job_summary: JobRecord,
    #[serde(with = "metric_group")]
    pub operational_frequency: Option<OperationalFrequency>,
    #[serde(with = "metric_group")]
    pub equipment_frequency: Option<EquipmentFrequency>,
    #[serde(with = "metric_group")]
    pub time_analysis: Option<TimeAnalysis>,
    #[serde(with = "metric_group")]
    pub efficiency_metrics: Option<EfficiencyMetrics>,
    pub daily_breakdown: Vec<DailyOperationRecord>,
    pub equipment_usage: EquipmentUsage,
    #[serde(with = "metric_group")]
    pub mill_performance: Option<MillPerformance>,
    #[serde(with = "metric_group")]
    pub ct_performance: Option<CtPerformance>,
    /// Serialized as message strings plus `recommendation_severities`
    #[serde(flatten, with = "super::advisory::recommendation_list")]
    pub recommendations: Vec<Recommendation>,
    pub data_source: DataSource,
    #[serde(default)]
    pub extraction_notes: Vec<ExtractionNote>,
}

impl AnalysisResult {
    /// Top-level keys guaranteed in the serialized result.
    pub const KEYS: [&'static str; 10] = [
        "job_summary",
        "operational_frequency",
        "equipment_frequency",
        "time_analysis",
        "efficiency_metrics",
        "daily_breakdown",
        "equipment_usage",
        "mill_performance",
        "ct_performance",
        "recommendations",
    ];

    pub fn is_demo(&self) -> bool {
        self.data_source == DataSource::Demo
    }

    /// Recommendation text in display order.
    pub fn recommendation_messages(&self) -> Vec<&str> {
        self.recommendations.iter().map(|r| r.message.as_str()).collect()
    }
}

/// Serde adapter mapping `None` to `{}` and `{}` back to `None`.
pub(crate) mod metric_group {
    use serde::de::{DeserializeOwned, Error as _, IgnoredAny};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(group) => group.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Group<T> {
        Present(T),
        Empty(BTreeMap<String, IgnoredAny>),
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match Group::<T>::deserialize(deserializer)? {
            Group::Present(group) => Ok(Some(group)),
            Group::Empty(map) if map.is_empty() => Ok(None),
            Group::Empty(_) => Err(D::Error::custom("incomplete metric group")),
        }
    }
}
