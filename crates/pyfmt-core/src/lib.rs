//! # pyfmt-core
//!
//! Shared configuration and logging for the pyfmt crates.
//!
//! ## Modules
//!
//! - `config`: layered TOML configuration (global, repo, explicit file)
//! - `logging`: tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    expand_path, get_config_home, Config, FormatterConfig, FormattersConfig,
    CURRENT_CONFIG_VERSION, DEFAULT_EXTENSIONS, DEFAULT_LINE_LENGTH, DEFAULT_SELECT,
    SUPPORTED_CONFIG_VERSIONS,
};
pub use error::{ConfigError, ConfigResult};
pub use logging::{init_logging, LogGuard};
