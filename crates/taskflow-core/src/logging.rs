//! File logging for the binary.
//!
//! Logs go to `<TASKFLOW_HOME>/taskflow.log`; stdout stays clean for
//! command output.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, paths};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "TASKFLOW_LOG";

pub const LOG_FILE_NAME: &str = "taskflow.log";

/// Builds the filter: `TASKFLOW_LOG` > config `log_level` > `info`.
pub fn env_filter(config: &Config) -> EnvFilter {
    if let Ok(directive) = std::env::var(LOG_ENV)
        && let Ok(filter) = EnvFilter::try_new(directive)
    {
        return filter;
    }
    EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to the log file.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    let home = paths::taskflow_home();
    fs::create_dir_all(&home)
        .with_context(|| format!("Failed to create directory {}", home.display()))?;

    let appender = tracing_appender::rolling::never(&home, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}
