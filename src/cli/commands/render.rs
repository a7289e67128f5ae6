use anyhow::{Context, Result};
use common::FilterQuery;
use compute::build_dashboard;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::cli::DataArgs;
use crate::config::{initialize_app_state, AppConfig};
use crate::helpers::page::render_page;

/// Renders the dashboard for one selection and writes the page to `output`.
#[instrument(skip(data))]
pub async fn render(output: &Path, query: FilterQuery, data: DataArgs) -> Result<()> {
    let config = AppConfig::load()?.with_overrides(None, data.historical_path, data.predicted_path);
    let state = initialize_app_state(&config);

    let dataset = state.dataset().await?;
    let dashboard = build_dashboard(&dataset, &query)?;
    debug!(source = dataset.source.label(), "Dashboard built");

    let page = render_page(&dashboard);
    tokio::fs::write(output, page)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Dashboard written to {}", output.display());
    Ok(())
}
