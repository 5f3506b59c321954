//! File-based logging module for the soundboard
//!
//! This module sets up tracing-based logging that writes to a file instead of stdout,
//! since the application uses a TUI that occupies the terminal.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "soundboard";
const DEFAULT_FILTER: &str = "soundboard=debug,warn";

/// Initialize the logging system.
///
/// Logs are written to `<log_dir>/soundboard.YYYY-MM-DD.log` with daily rotation.
/// The log level can be controlled via the `RUST_LOG` environment variable.
///
/// Default log levels:
/// - `soundboard` modules: DEBUG
/// - Other crates: WARN
pub fn init_logging(log_dir: &Path) -> anyhow::Result<()> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);

    // Non-blocking writer so the UI loop never waits on disk
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes on drop; keep it for the lifetime of the process
    Box::leak(Box::new(guard));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI colors in log files
        .with_target(true) // Include module path
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}/", log_dir.display());

    Ok(())
}
