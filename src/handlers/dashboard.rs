use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{Html, Json},
};
use common::{ApiResponse, FilterQuery};
use compute::DashboardView;
use tracing::{instrument, warn};

use super::dashboard_for;
use crate::helpers::page::render_page;
use crate::schemas::{data_error, ApiError, AppState, DashboardResponse};

/// The dashboard page.
///
/// Every interaction is a full form submission that re-runs filtering and
/// rendering. Malformed parameters fall back to the default selection.
#[instrument(skip(state))]
pub async fn dashboard_page(
    query: Result<Query<FilterQuery>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Html<String>, ApiError> {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!("Ignoring invalid dashboard parameters: {}", rejection);
            FilterQuery::default()
        }
    };

    let dashboard = dashboard_for(&state, &query).await?;
    Ok(Html(render_page(&dashboard)))
}

/// Dashboard content for a selection: resolved filter, metric cards,
/// insights and summary statistics
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    params(FilterQuery),
    responses(
        (status = 200, description = "Dashboard built successfully", body = ApiResponse<DashboardResponse>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_dashboard(
    Query(query): Query<FilterQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardResponse>>, ApiError> {
    let dashboard = dashboard_for(&state, &query).await?;
    let filter = dashboard.controls.filter;

    let mut response = DashboardResponse {
        attribute: filter.attribute,
        provenance: filter.provenance,
        date_range: filter.date_range,
        data_source: dashboard.source.label().to_string(),
        data_error: data_error(&dashboard.source),
        warning: None,
        cards: Vec::new(),
        insights: Vec::new(),
        summary: Vec::new(),
    };

    let message = match dashboard.view {
        DashboardView::Ready(view) => {
            response.cards = view.cards;
            response.insights = view.insights;
            response.summary = view.summary;
            "Dashboard built successfully".to_string()
        }
        DashboardView::Empty { message } => {
            response.warning = Some(message.clone());
            message
        }
    };

    Ok(Json(ApiResponse::ok(response, message)))
}
