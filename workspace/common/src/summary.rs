use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::Provenance;

/// One of the four headline cards above the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    /// Secondary line shown under the value
    pub delta: String,
}

/// Descriptive statistics of one attribute for one provenance group.
///
/// Values are rounded to two decimals. `std` is the sample standard
/// deviation and is absent for groups with a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SummaryRow {
    pub provenance: Provenance,
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}
