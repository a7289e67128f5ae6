use axum::{
    extract::{Query, State},
    response::Json,
};
use common::{ApiResponse, FilterQuery, SummaryRow};
use compute::DashboardView;
use tracing::instrument;

use super::dashboard_for;
use crate::schemas::{ApiError, AppState};

/// Summary statistics of the selected attribute grouped by data type
#[utoipa::path(
    get,
    path = "/api/v1/summary",
    tag = "dashboard",
    params(FilterQuery),
    responses(
        (status = 200, description = "Summary statistics computed successfully", body = ApiResponse<Vec<SummaryRow>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_summary(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SummaryRow>>>, ApiError> {
    let dashboard = dashboard_for(&state, &query).await?;

    let response = match dashboard.view {
        DashboardView::Ready(view) => {
            ApiResponse::ok(view.summary, "Summary statistics computed successfully")
        }
        DashboardView::Empty { message } => ApiResponse::ok(Vec::new(), message),
    };

    Ok(Json(response))
}
