use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid log level '{0}', expected one of: off, error, warn, info, debug, trace")]
    LogLevel(String),

    #[error("Failed to open log file {}: {reason}", path.display())]
    LogFile { path: PathBuf, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
