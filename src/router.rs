use crate::handlers::{
    charts::{get_distribution_chart, get_timeseries_chart},
    dashboard::{dashboard_page, get_dashboard},
    health::health_check,
    insights::get_insights,
    metadata::get_attributes,
    statistics::get_summary,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{routing::get, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Server-rendered dashboard
        .route("/", get(dashboard_page))
        // Health check
        .route("/health", get(health_check))
        // Dashboard content
        .route("/api/v1/attributes", get(get_attributes))
        .route("/api/v1/dashboard", get(get_dashboard))
        .route("/api/v1/insights", get(get_insights))
        .route("/api/v1/summary", get(get_summary))
        // Chart figures
        .route("/api/v1/charts/timeseries", get(get_timeseries_chart))
        .route("/api/v1/charts/distribution", get(get_distribution_chart))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
