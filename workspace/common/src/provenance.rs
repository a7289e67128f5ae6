use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Where a measurement row comes from: recorded history or a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Provenance {
    Historical,
    Predicted,
}

impl Provenance {
    /// Both provenances in display order.
    pub const ALL: [Provenance; 2] = [Provenance::Historical, Provenance::Predicted];

    /// Label stored in the `data_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Historical => "Historical",
            Provenance::Predicted => "Predicted",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provenance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Historical" => Ok(Provenance::Historical),
            "Predicted" => Ok(Provenance::Predicted),
            other => Err(format!("unknown provenance '{}'", other)),
        }
    }
}

/// Provenance selector of the dashboard (the "Data Type" radio group).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProvenanceFilter {
    #[default]
    Both,
    Historical,
    Predicted,
}

impl ProvenanceFilter {
    /// Radio options in the order they are offered.
    pub const OPTIONS: [ProvenanceFilter; 3] = [
        ProvenanceFilter::Both,
        ProvenanceFilter::Historical,
        ProvenanceFilter::Predicted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProvenanceFilter::Both => "Both",
            ProvenanceFilter::Historical => "Historical",
            ProvenanceFilter::Predicted => "Predicted",
        }
    }

    /// Whether rows of the given provenance pass this filter.
    pub fn includes(&self, provenance: Provenance) -> bool {
        match self {
            ProvenanceFilter::Both => true,
            ProvenanceFilter::Historical => provenance == Provenance::Historical,
            ProvenanceFilter::Predicted => provenance == Provenance::Predicted,
        }
    }

    /// The single provenance this filter narrows to, if any.
    pub fn only(&self) -> Option<Provenance> {
        match self {
            ProvenanceFilter::Both => None,
            ProvenanceFilter::Historical => Some(Provenance::Historical),
            ProvenanceFilter::Predicted => Some(Provenance::Predicted),
        }
    }
}

impl fmt::Display for ProvenanceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProvenanceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("both") => Ok(ProvenanceFilter::Both),
            s if s.eq_ignore_ascii_case("historical") => Ok(ProvenanceFilter::Historical),
            s if s.eq_ignore_ascii_case("predicted") => Ok(ProvenanceFilter::Predicted),
            other => Err(format!(
                "unknown data type '{}', expected one of Both, Historical, Predicted",
                other
            )),
        }
    }
}
