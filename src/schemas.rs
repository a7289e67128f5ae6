use anyhow::anyhow;
use axum::{http::StatusCode, Json};
use common::{
    ApiResponse, DateRange, FilterQuery, Insight, InsightKind, MetricCard, Provenance,
    ProvenanceFilter, Severity, SummaryRow,
};
use compute::{DataSource, Dataset, DatasetPaths};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Input files served by this process
    pub paths: DatasetPaths,
    /// Loaded datasets, one per pair of input files
    pub cache: Cache<DatasetPaths, Arc<Dataset>>,
}

impl AppState {
    /// Returns the cached dataset, loading it on first use.
    ///
    /// Concurrent first callers share a single load. A failed load is not
    /// cached, so the next request tries again.
    pub async fn dataset(&self) -> anyhow::Result<Arc<Dataset>> {
        let paths = self.paths.clone();
        self.cache
            .try_get_with(self.paths.clone(), async move {
                debug!("Loading dataset");
                let dataset =
                    tokio::task::spawn_blocking(move || compute::load_current(&paths)).await??;
                Ok::<_, anyhow::Error>(Arc::new(dataset))
            })
            .await
            .map_err(|e| {
                error!("Failed to load dataset: {}", e);
                anyhow!("{}", e)
            })
    }
}

/// API error type: status plus JSON body
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            success: false,
        }
    }

    pub fn into_api_error(self, status: StatusCode) -> ApiError {
        (status, Json(self))
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Where the served data comes from: files or synthetic
    pub data_source: String,
    /// Rows in the combined dataset
    pub rows: usize,
}

/// Choices offered by the dashboard controls
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttributesResponse {
    /// Numeric attributes, in column order
    pub attributes: Vec<String>,
    /// Data type options
    pub provenance_options: Vec<ProvenanceFilter>,
    /// First and last day of the data
    pub bounds: Option<DateRange>,
    pub data_source: String,
}

/// Non-chart content of the dashboard for one selection
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    /// Resolved attribute, absent when none is selectable
    pub attribute: Option<String>,
    pub provenance: ProvenanceFilter,
    /// Resolved inclusive date range
    pub date_range: Option<DateRange>,
    pub data_source: String,
    /// Why the input files were replaced by synthetic data
    pub data_error: Option<String>,
    /// Set when the selection has no data; everything below is then empty
    pub warning: Option<String>,
    pub cards: Vec<MetricCard>,
    pub insights: Vec<Insight>,
    pub summary: Vec<SummaryRow>,
}

pub fn data_error(source: &DataSource) -> Option<String> {
    match source {
        DataSource::Files => None,
        DataSource::Synthetic { reason } => Some(reason.clone()),
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::metadata::get_attributes,
        crate::handlers::dashboard::get_dashboard,
        crate::handlers::insights::get_insights,
        crate::handlers::statistics::get_summary,
        crate::handlers::charts::get_timeseries_chart,
        crate::handlers::charts::get_distribution_chart,
    ),
    components(
        schemas(
            ApiResponse<AttributesResponse>,
            ApiResponse<DashboardResponse>,
            ApiResponse<Vec<Insight>>,
            ApiResponse<Vec<SummaryRow>>,
            ErrorResponse,
            HealthResponse,
            AttributesResponse,
            DashboardResponse,
            FilterQuery,
            DateRange,
            Provenance,
            ProvenanceFilter,
            Insight,
            InsightKind,
            Severity,
            MetricCard,
            SummaryRow,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dashboard", description = "Dashboard content endpoints"),
        (name = "charts", description = "Plotly figure endpoints"),
    ),
    info(
        title = "Health Dashboard API",
        description = "Patient health trend analysis over historical and predicted measurements",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
