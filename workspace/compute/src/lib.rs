//! Analytical core of the patient health dashboard: loading the measurement
//! files, filtering, statistics, insight rules and the page view model.

pub mod dashboard;
pub mod error;
pub mod filter;
pub mod frame;
pub mod insights;
pub mod loader;
pub mod stats;
pub mod synthetic;

#[cfg(test)]
mod test_utils;

pub use dashboard::{build_dashboard, Dashboard, DashboardView, ProvenanceSeries, ReadyView};
pub use filter::FilterState;
pub use loader::{load_dataset, DataSource, Dataset, DatasetPaths};

use chrono::{NaiveDateTime, Utc};

/// Loads the dataset as of the current time.
///
/// This is what the server and the CLI use; tests pass an explicit `now` to
/// `load_dataset` so synthesized timestamps are reproducible.
pub fn load_current(paths: &DatasetPaths) -> error::Result<Dataset> {
    load_dataset(paths, now())
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
