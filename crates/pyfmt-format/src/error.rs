use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Formatter command is empty")]
    EmptyCommand,

    #[error("Cannot split formatter command `{command}`: {source}")]
    InvalidArguments {
        command: String,
        #[source]
        source: shell_words::ParseError,
    },

    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl FormatError {
    /// Exit code standing in for a formatter that never ran
    pub fn exit_code(&self) -> i32 {
        match self {
            FormatError::Spawn { .. } => crate::runner::SPAWN_FAILURE_EXIT_CODE,
            FormatError::EmptyCommand | FormatError::InvalidArguments { .. } => 2,
        }
    }
}

pub type FormatResult<T> = Result<T, FormatError>;
