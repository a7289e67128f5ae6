use anyhow::Result;
use compute::DatasetPaths;
use compute::loader::{DEFAULT_HISTORICAL_PATH, DEFAULT_PREDICTED_PATH};
use ::config::{Config, Environment, File};
use moka::future::Cache;
use serde::Deserialize;
use std::path::PathBuf;

use crate::schemas::AppState;

/// Default address the dashboard listens on.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8501";

/// Application settings.
///
/// Sources, lowest precedence first: built-in defaults, an optional
/// `healthdash.toml` in the working directory, `HEALTHDASH_*` environment
/// variables (a `.env` file is honored). Command-line flags override all of
/// them.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_address: String,
    pub historical_path: PathBuf,
    pub predicted_path: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("historical_path", DEFAULT_HISTORICAL_PATH)?
            .set_default("predicted_path", DEFAULT_PREDICTED_PATH)?
            .add_source(File::with_name("healthdash").required(false))
            .add_source(Environment::with_prefix("HEALTHDASH"))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        bind_address: Option<String>,
        historical_path: Option<PathBuf>,
        predicted_path: Option<PathBuf>,
    ) -> Self {
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
        if let Some(path) = historical_path {
            self.historical_path = path;
        }
        if let Some(path) = predicted_path {
            self.predicted_path = path;
        }
        self
    }

    pub fn dataset_paths(&self) -> DatasetPaths {
        DatasetPaths::new(&self.historical_path, &self.predicted_path)
    }
}

/// Initialize application state
///
/// The dataset itself is loaded lazily on the first request and then kept
/// for the lifetime of the process.
pub fn initialize_app_state(config: &AppConfig) -> AppState {
    tracing::info!(
        historical = %config.historical_path.display(),
        predicted = %config.predicted_path.display(),
        "Dataset will be loaded on first request"
    );

    // One entry per pair of input paths, never expired
    let cache = Cache::builder().max_capacity(8).build();

    AppState {
        paths: config.dataset_paths(),
        cache,
    }
}
