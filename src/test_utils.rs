#[cfg(test)]
pub mod test_utils {
    use crate::config::{initialize_app_state, AppConfig, DEFAULT_BIND_ADDRESS};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Four historical rows over two days, then three forecast rows.
    pub const HISTORICAL_CSV: &str = "datetime,HeartRate,StressIndex,note
2024-01-01 00:00:00,70,40,rest
2024-01-01 12:00:00,72,42,walk
2024-01-02 00:00:00,74,44,rest
2024-01-02 12:00:00,76,46,run
";

    pub const PREDICTED_CSV: &str = "datetime,HeartRate,StressIndex
2024-01-03 00:00:00,90,50
2024-01-03 12:00:00,92,52
2024-01-04 00:00:00,94,54
";

    /// Writes the fixture files into a fresh directory.
    ///
    /// The directory is removed when the returned guard is dropped.
    pub fn write_fixtures() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let historical = dir.path().join("historical.csv");
        let predicted = dir.path().join("predicted.csv");
        std::fs::write(&historical, HISTORICAL_CSV).expect("Failed to write historical fixture");
        std::fs::write(&predicted, PREDICTED_CSV).expect("Failed to write predicted fixture");
        (dir, historical, predicted)
    }

    /// Create AppState for testing
    pub fn setup_test_app_state(historical: PathBuf, predicted: PathBuf) -> AppState {
        let config = AppConfig {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            historical_path: historical,
            predicted_path: predicted,
        };
        initialize_app_state(&config)
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app over the fixture files.
    ///
    /// Keep the returned directory alive for as long as the app is used.
    pub fn setup_test_app() -> (Router, TempDir) {
        let _guard = init_test_tracing();
        let (dir, historical, predicted) = write_fixtures();
        let app = create_router(setup_test_app_state(historical, predicted));
        (app, dir)
    }

    /// Create axum app whose input files do not exist, so it serves the
    /// synthetic dataset.
    pub fn setup_synthetic_app() -> (Router, TempDir) {
        let _guard = init_test_tracing();
        let dir = TempDir::new().expect("Failed to create temp dir");
        let app = create_router(setup_test_app_state(
            dir.path().join("missing_historical.csv"),
            dir.path().join("missing_predicted.csv"),
        ));
        (app, dir)
    }
}
