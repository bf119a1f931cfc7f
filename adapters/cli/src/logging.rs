//! File-backed tracing setup; the terminal UI owns stdout.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the log file created inside the log directory.
pub(crate) const LOG_FILE_NAME: &str = "maze-escape.log";

/// Installs the global subscriber writing to `directory`.
///
/// The returned guard flushes pending records when dropped and must outlive
/// the run.
pub(crate) fn init(directory: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(directory, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!(
        file = %directory.join(LOG_FILE_NAME).display(),
        "logging initialised"
    );
    Ok(guard)
}
