//! Tracing subscriber setup

use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;

/// Keeps the non-blocking file writer flushing until dropped.
#[must_use]
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

pub fn parse_level(level: &str) -> ConfigResult<LevelFilter> {
    LevelFilter::from_str(level.trim()).map_err(|_| ConfigError::LogLevel(level.to_string()))
}

/// Install the global subscriber. Logs go to stderr, or to `log_file` when given.
///
/// A subscriber installed earlier (e.g. by a test harness) is left in place.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> ConfigResult<LogGuard> {
    let level = parse_level(level)?;

    let Some(log_file) = log_file else {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return Ok(LogGuard { _guard: None });
    };

    let file_name = log_file.file_name().ok_or_else(|| ConfigError::LogFile {
        path: log_file.to_path_buf(),
        reason: "path has no file name".to_string(),
    })?;
    let dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| ConfigError::LogFile {
        path: log_file.to_path_buf(),
        reason: e.to_string(),
    })?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(writer)
        .try_init();

    Ok(LogGuard {
        _guard: Some(guard),
    })
}
