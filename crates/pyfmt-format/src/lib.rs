//! Formatter command templates and execution
//!
//! Builds argument vectors for the external formatters from immutable templates,
//! runs them without a shell, and renders their output for the terminal.

mod error;
mod formatter;
mod runner;
mod snapshot;

pub use error::{FormatError, FormatResult};
pub use formatter::{
    build_argv, paths_argument, CommandParams, Formatter, FormatterSpec, BLACK_ARGS, ISORT_ARGS,
};
pub use runner::{execute, RunResult, SPAWN_FAILURE_EXIT_CODE};
pub use snapshot::ContentSnapshot;
