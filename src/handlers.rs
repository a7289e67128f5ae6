pub mod charts;
pub mod dashboard;
pub mod health;
pub mod insights;
pub mod metadata;
pub mod statistics;

use axum::http::StatusCode;
use common::FilterQuery;
use compute::{build_dashboard, Dashboard};
use tracing::error;

use crate::schemas::{ApiError, AppState, ErrorResponse};

/// Loads the cached dataset and builds the dashboard for `query`.
pub(crate) async fn dashboard_for(state: &AppState, query: &FilterQuery) -> Result<Dashboard, ApiError> {
    let dataset = state.dataset().await.map_err(|e| {
        ErrorResponse::new(e.to_string(), "DATASET_UNAVAILABLE")
            .into_api_error(StatusCode::INTERNAL_SERVER_ERROR)
    })?;

    build_dashboard(&dataset, query).map_err(|e| {
        error!("Failed to build dashboard: {}", e);
        ErrorResponse::new(e.to_string(), "DASHBOARD_FAILED")
            .into_api_error(StatusCode::INTERNAL_SERVER_ERROR)
    })
}
