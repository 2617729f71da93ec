//! Formatter subprocess execution and report rendering

use crate::error::{FormatError, FormatResult};
use std::path::Path;
use std::process::{Command, Stdio};

/// Exit code recorded when a formatter cannot be started at all
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// Outcome of one formatter invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub tool: String,
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl RunResult {
    /// Standard output lines followed by standard error lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout
            .iter()
            .chain(self.stderr.iter())
            .map(String::as_str)
    }

    /// `"{tool}: "` followed by the output, continuation lines aligned under it.
    pub fn report(&self) -> String {
        let prefix = format!("{}: ", self.tool);
        if self.lines().all(str::is_empty) {
            return format!("{}No changes.", prefix);
        }
        let sep = format!("\n{}", " ".repeat(prefix.chars().count()));
        let body = self.lines().collect::<Vec<_>>().join(&sep);
        format!("{}{}", prefix, body)
    }
}

fn tool_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string())
}

/// Run `argv[0]` with the remaining elements as discrete arguments.
///
/// Blocks until the process exits. A non-zero exit is reported in the result, not
/// as an error; only failing to start the process is an error.
pub fn execute(argv: &[String]) -> FormatResult<RunResult> {
    let (program, args) = argv.split_first().ok_or(FormatError::EmptyCommand)?;
    tracing::info!(program = %program, ?args, "running formatter");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| FormatError::Spawn {
            program: program.clone(),
            source,
        })?;

    let exit_code = output.status.code().unwrap_or(-1);
    tracing::debug!(program = %program, exit_code, "formatter finished");

    Ok(RunResult {
        tool: tool_name(program),
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect(),
        stderr: String::from_utf8_lossy(&output.stderr)
            .lines()
            .map(str::to_string)
            .collect(),
    })
}
