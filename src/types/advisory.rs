//! Recommendation types with structured severity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display category attached at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Positive,
    Warning,
    Efficiency,
    Safety,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "POSITIVE"),
            Self::Warning => write!(f, "WARNING"),
            Self::Efficiency => write!(f, "EFFICIENCY"),
            Self::Safety => write!(f, "SAFETY"),
            Self::Info => write!(f, "INFO"),
        }
    }
}

/// A single themed advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub severity: Severity,
    pub message: String,
}

impl Recommendation {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Serde adapter keeping `recommendations` a list of message strings.
///
/// Severities travel in the sibling `recommendation_severities` key, in the
/// same order. Use with `#[serde(flatten, with = "recommendation_list")]`.
pub(crate) mod recommendation_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Recommendation, Severity};

    #[derive(Serialize)]
    struct Borrowed<'a> {
        recommendations: Vec<&'a str>,
        recommendation_severities: Vec<Severity>,
    }

    #[derive(Deserialize)]
    struct Owned {
        recommendations: Vec<String>,
        #[serde(default)]
        recommendation_severities: Vec<Severity>,
    }

    pub fn serialize<S>(recs: &[Recommendation], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Borrowed {
            recommendations: recs.iter().map(|r| r.message.as_str()).collect(),
            recommendation_severities: recs.iter().map(|r| r.severity).collect(),
        }
        .serialize(serializer)
    }

    /// Messages without a matching severity are tagged `Info`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Recommendation>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = Owned::deserialize(deserializer)?;
        let mut severities = wire.recommendation_severities.into_iter();
        Ok(wire
            .recommendations
            .into_iter()
            .map(|message| Recommendation {
                severity: severities.next().unwrap_or(Severity::Info),
                message,
            })
            .collect())
    }
}
