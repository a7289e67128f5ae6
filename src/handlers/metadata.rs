use axum::{extract::State, http::StatusCode, response::Json};
use common::{ApiResponse, ProvenanceFilter};
use tracing::{error, instrument};

use crate::schemas::{AppState, AttributesResponse};

/// Controls metadata: selectable attributes, data type options and the date
/// bounds of the loaded data
#[utoipa::path(
    get,
    path = "/api/v1/attributes",
    tag = "dashboard",
    responses(
        (status = 200, description = "Attributes retrieved successfully", body = ApiResponse<AttributesResponse>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_attributes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AttributesResponse>>, StatusCode> {
    let dataset = state.dataset().await.map_err(|e| {
        error!("Failed to load dataset: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let bounds = match dataset.date_bounds() {
        Ok(bounds) => bounds,
        Err(e) => {
            error!("Failed to read date bounds: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let response = AttributesResponse {
        attributes: dataset.attributes(),
        provenance_options: ProvenanceFilter::OPTIONS.to_vec(),
        bounds,
        data_source: dataset.source.label().to_string(),
    };

    Ok(Json(ApiResponse::ok(response, "Attributes retrieved successfully")))
}
