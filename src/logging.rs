// ABOUTME: Tracing setup — daily rolling log file behind a non-blocking writer.
// ABOUTME: The TUI owns the terminal, so nothing is ever logged to stdout or stderr.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// File name prefix; the appender adds a `.YYYY-MM-DD` suffix.
const LOG_FILE_PREFIX: &str = "llama-chat.log";

/// Install the global subscriber when a log directory is configured.
///
/// Returns the appender guard, which must be held until shutdown so buffered
/// lines are flushed. Returns `None` when file logging is disabled.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let Some(dir) = config.dir.as_ref() else {
        return Ok(None);
    };
    std::fs::create_dir_all(dir)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    Ok(Some(guard))
}
