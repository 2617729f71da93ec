use clap::{Parser, ValueEnum};
use pyfmt_vcs::SelectionPolicy;

#[derive(Debug, Parser)]
#[command(
    name = "pyfmt",
    version,
    about = "Python auto-formatting using isort and black"
)]
pub struct Cli {
    /// Path to base directory where pyfmt will be run
    #[arg(value_name = "PATH", env = "BASE_CODE_DIR", default_value = ".")]
    pub path: String,

    /// Filter which files to format in PATH [default: all]
    #[arg(short, long, value_enum)]
    pub select: Option<SelectionPolicy>,

    /// Don't write changes, just print the files that would be formatted
    #[arg(short, long)]
    pub check: bool,

    /// Commit changes if any files were formatted
    #[arg(long, value_enum, default_value = "no")]
    pub commit: CommitMode,

    /// Commit message; git opens an editor when omitted
    #[arg(short, long)]
    pub message: Option<String>,

    /// Max characters per line [default: 100]
    #[arg(long, env = "MAX_LINE_LENGTH")]
    pub line_length: Option<usize>,

    /// Additional args to pass to isort
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub extra_isort_args: Option<String>,

    /// Additional args to pass to black
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub extra_black_args: Option<String>,

    /// Specify configuration file path
    #[arg(long, env = "PYFMT_CONFIG")]
    pub config: Option<String>,

    /// Log level
    #[arg(long, env = "PYFMT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CommitMode {
    /// Do not commit changes
    No,
    /// Commit every formatted file
    #[value(alias = "yes")]
    All,
    /// Interactively pick hunks to commit (`git commit --patch`)
    Patch,
    /// Amend the previous commit with the formatted files
    Amend,
}

impl CommitMode {
    pub fn is_requested(&self) -> bool {
        *self != CommitMode::No
    }
}
