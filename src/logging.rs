//! Tracing subscriber setup shared by both binaries.

use crate::app_dirs;
use crate::config::LoggingConfig;
use crate::error::{Result, SentiscopeError};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Build the filter: `RUST_LOG` when set, otherwise the configured level.
///
/// # Errors
///
/// Returns a config error when the configured level does not parse.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(config.level.to_ascii_lowercase())
        .map_err(|e| SentiscopeError::Config(format!("invalid log level '{}': {e}", config.level)))
}

/// A bare file name lands in [`app_dirs::logs_dir`].
fn non_blocking_file(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path.file_name().ok_or_else(|| {
        SentiscopeError::Config(format!("log file path has no file name: {}", path.display()))
    })?;
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => app_dirs::logs_dir(),
    };
    std::fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the global subscriber: stderr always, plus a non-blocking file
/// layer when `config.file` is set.
///
/// Keep the returned guard alive for the life of the process so buffered
/// file output is flushed. A subscriber that is already installed is left
/// in place.
///
/// # Errors
///
/// Returns an error for an invalid level or an unwritable log directory.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(config)?;
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let (writer, guard) = non_blocking_file(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed; keeping existing one");
    }
    Ok(guard)
}
