use thiserror::Error;

#[derive(Error, Debug)]
pub enum VcsError {
    #[error("Unknown selector '{0}', expected one of: staged, modified, head, local, all")]
    UnknownSelector(String),

    #[error("Invalid status code '{0}'")]
    InvalidStatusCode(String),

    #[error("Selection query `{command}` failed: {reason}")]
    SelectionQuery { command: String, reason: String },

    #[error("Adding files with `{command}` failed: {reason}")]
    Add { command: String, reason: String },

    #[error("Commit failed: {0}")]
    Commit(String),
}

pub type VcsResult<T> = Result<T, VcsError>;
