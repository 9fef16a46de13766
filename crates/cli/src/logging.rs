use quotation_core::config::{AppConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Events go to stderr so command output on
/// stdout stays machine-readable. A second call is a no-op.
pub fn init(config: &AppConfig) {
    let filter = EnvFilter::try_new(config.logging.level.trim().to_ascii_lowercase())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(
            event_name = "cli.logging.initialized",
            correlation_id = "bootstrap",
            format = ?config.logging.format,
            "logging initialized"
        );
    }
}
