use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,sea_orm=warn,sqlx::query=warn";

/// Installs the global subscriber: JSON lines into a daily-rotated file under
/// `log_dir`, plus human-readable output on stdout.
pub fn init_logging(log_dir: &str, file_name: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, file_name);
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}
