use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How an insight should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Positive,
    Neutral,
}

/// Rule that produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Mean shift between historical and predicted values
    Shift,
    /// Direction of the linear trend
    Trend,
    /// Coefficient of variation classification
    Variability,
}

/// A single human-readable observation about the filtered data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    pub text: String,
}

impl Insight {
    pub fn new(kind: InsightKind, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            text: text.into(),
        }
    }
}
