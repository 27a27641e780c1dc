//! Process-wide tracing setup.
//!
//! Without a log file records go to stderr. With one, everything goes to the file at
//! debug level and the console stays quiet so stdio belongs to the MCP host.

use std::fs::OpenOptions;

use ghmcp_core::api::{CliError, Logger, LoggingConfig};
use tracing::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Builds the dispatcher without installing it. The guard must outlive every record
/// written to a log file.
pub fn build_dispatch<F>(
    logging: &LoggingConfig,
    log_file: Option<&str>,
    env: F,
) -> Result<(Dispatch, Option<WorkerGuard>), CliError>
where
    F: Fn(&str) -> Option<String>,
{
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| CliError::Logger(format!("failed to open log file {path}: {e}")))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let filter = EnvFilter::try_new(&logging.file_level)
                .map_err(|e| CliError::Logger(e.to_string()))?;
            let subscriber = tracing_subscriber::registry().with(filter).with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            );
            Ok((Dispatch::new(subscriber), Some(guard)))
        }
        None => {
            let filter = match env("RUST_LOG") {
                Some(v) if !v.trim().is_empty() => {
                    EnvFilter::try_new(v).map_err(|e| CliError::Logger(e.to_string()))?
                }
                _ => EnvFilter::try_new(&logging.level)
                    .map_err(|e| CliError::Logger(e.to_string()))?,
            };
            let subscriber = tracing_subscriber::registry().with(filter).with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(atty::is(atty::Stream::Stderr)),
            );
            Ok((Dispatch::new(subscriber), None))
        }
    }
}

/// Builds the dispatcher, makes it the global default and wraps it in a `Logger`.
pub fn init_logger(
    logging: &LoggingConfig,
    log_file: Option<&str>,
) -> Result<(Logger, Option<WorkerGuard>), CliError> {
    let (dispatch, guard) = build_dispatch(logging, log_file, |k| std::env::var(k).ok())?;
    tracing::dispatcher::set_global_default(dispatch.clone())
        .map_err(|e| CliError::Logger(e.to_string()))?;
    Ok((Logger::new(dispatch), guard))
}
