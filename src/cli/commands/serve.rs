use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::cli::DataArgs;
use crate::config::{initialize_app_state, AppConfig};
use crate::router::create_router;

pub async fn serve(bind_address: Option<String>, data: DataArgs) -> Result<()> {
    trace!("Entering serve function");
    info!("Health dashboard starting up");

    trace!("Loading configuration");
    let config = match AppConfig::load() {
        Ok(config) => config.with_overrides(bind_address, data.historical_path, data.predicted_path),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };
    debug!("Historical data: {}", config.historical_path.display());
    debug!("Predicted data: {}", config.predicted_path.display());
    debug!("Bind address: {}", config.bind_address);

    // Initialize application state
    trace!("Initializing application state");
    let state = initialize_app_state(&config);
    debug!("Application state initialized successfully");

    // Create router
    trace!("Creating application router");
    let app = create_router(state);
    debug!("Router created successfully");

    // Start server
    let bind_address = config.bind_address;
    info!("Starting server on {}", bind_address);
    trace!("Attempting to bind TCP listener to {}", bind_address);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Dashboard running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);
    debug!("Server is ready to accept connections");

    trace!("Starting axum server");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
