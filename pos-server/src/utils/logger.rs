//! Logging Infrastructure
//!
//! `tracing` subscriber with an env filter, human or JSON stdout output and
//! an optional daily rolling log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log file prefix under the log directory
const LOG_FILE_PREFIX: &str = "pos-server.log";

/// Initialize the logger with stdout output only
pub fn init_logger() {
    let _guard = init_logger_with_file(None, false, None);
}

/// Initialize the logger
///
/// `RUST_LOG` takes precedence over `log_level`. When `log_dir` is given
/// the directory is created and logs are also written to a daily file
/// there. Keep the returned guard alive for as long as file logging is
/// needed; dropping it flushes and stops the writer.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json: bool,
    log_dir: Option<&Path>,
) -> Option<WorkerGuard> {
    let level = log_level.unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},http_access={level},redb=warn")));

    let (file_layer, guard) = match log_dir.and_then(file_writer) {
        Some((writer, guard)) => (
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_writer(writer),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    let stdout_json = json.then(|| fmt::layer().json().with_target(true));
    let stdout_text = (!json).then(|| fmt::layer().with_target(false));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_json)
        .with(stdout_text)
        .with(file_layer)
        .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }

    guard
}

fn file_writer(dir: &Path) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Failed to create log directory {}: {e}", dir.display());
        return None;
    }
    let appender = rolling::daily(dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}
