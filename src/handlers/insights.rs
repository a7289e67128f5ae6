use axum::{
    extract::{Query, State},
    response::Json,
};
use common::{ApiResponse, FilterQuery, Insight};
use compute::DashboardView;
use tracing::instrument;

use super::dashboard_for;
use crate::schemas::{ApiError, AppState};

/// Automated insights for the selection
///
/// An empty list means the selection has no data.
#[utoipa::path(
    get,
    path = "/api/v1/insights",
    tag = "dashboard",
    params(FilterQuery),
    responses(
        (status = 200, description = "Insights generated successfully", body = ApiResponse<Vec<Insight>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_insights(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Insight>>>, ApiError> {
    let dashboard = dashboard_for(&state, &query).await?;

    let response = match dashboard.view {
        DashboardView::Ready(view) => ApiResponse::ok(view.insights, "Insights generated successfully"),
        DashboardView::Empty { message } => ApiResponse::ok(Vec::new(), message),
    };

    Ok(Json(response))
}
