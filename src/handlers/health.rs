use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, instrument};
use crate::schemas::{AppState, HealthResponse};

/// Health check endpoint
///
/// Loads the dataset if no request has done so yet.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Service is unhealthy", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let dataset = match state.dataset().await {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Health check failed: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_source: dataset.source.label().to_string(),
        rows: dataset.rows(),
    };

    Ok(Json(response))
}
