//! Common transport-layer types shared between the compute crate, the HTTP
//! handlers, the CLI and the HTML page renderer.
//!
//! Nothing in here touches polars; every type is plain data that serializes
//! the same way for the JSON API and for the server-rendered page.

mod filter;
mod insight;
mod provenance;
mod summary;

pub use filter::{DateRange, FilterQuery};
pub use insight::{Insight, InsightKind, Severity};
pub use provenance::{Provenance, ProvenanceFilter};
pub use summary::{MetricCard, SummaryRow};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}
