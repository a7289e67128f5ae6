use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use common::FilterQuery;
use compute::{DashboardView, ReadyView};
use plotly::Plot;
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::dashboard_for;
use crate::helpers::charts::{distribution_chart, time_chart};
use crate::schemas::{ApiError, AppState, ErrorResponse};

/// Time series figure of the selected attribute
#[utoipa::path(
    get,
    path = "/api/v1/charts/timeseries",
    tag = "charts",
    params(FilterQuery),
    responses(
        (status = 200, description = "Plotly figure JSON", body = Object),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "No data for the selection", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_timeseries_chart(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let dashboard = dashboard_for(&state, &query).await?;
    let filter = dashboard.controls.filter.provenance;
    let view = ready_view(dashboard.view)?;

    figure(&time_chart(&view.series, &view.attribute, filter))
}

/// Histogram and box plot figure of the selected attribute
#[utoipa::path(
    get,
    path = "/api/v1/charts/distribution",
    tag = "charts",
    params(FilterQuery),
    responses(
        (status = 200, description = "Plotly figure JSON", body = Object),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "No data for the selection", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_distribution_chart(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let dashboard = dashboard_for(&state, &query).await?;
    let view = ready_view(dashboard.view)?;

    figure(&distribution_chart(&view.series, &view.attribute))
}

fn ready_view(view: DashboardView) -> Result<ReadyView, ApiError> {
    match view {
        DashboardView::Ready(view) => Ok(view),
        DashboardView::Empty { message } => {
            debug!("No chart for an empty selection");
            Err(ErrorResponse::new(message, "NO_DATA").into_api_error(StatusCode::NOT_FOUND))
        }
    }
}

fn figure(plot: &Plot) -> Result<Json<Value>, ApiError> {
    serde_json::from_str(&plot.to_json()).map(Json).map_err(|e| {
        error!("Failed to serialize chart: {}", e);
        ErrorResponse::new(e.to_string(), "CHART_FAILED")
            .into_api_error(StatusCode::INTERNAL_SERVER_ERROR)
    })
}
