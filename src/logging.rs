use crate::{CONFIG_DIRECTORY, LOG_FILE};
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "onair=info";

pub fn log_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIRECTORY))
}

/// Sends `tracing` output to a log file in the config directory.
///
/// The terminal belongs to the UI, so nothing is written to stdout. The
/// filter comes from `RUST_LOG` when set. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init() -> Result<WorkerGuard> {
    let dir = log_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::never(&dir, LOG_FILE));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))?;

    Ok(guard)
}
