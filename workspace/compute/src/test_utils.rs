use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize tracing for tests with output to STDERR.
///
/// The log level is determined by the RUST_LOG environment variable,
/// defaulting to WARN if not set.
pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}
