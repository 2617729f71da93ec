//! Formatter templates and argument-vector building

use crate::error::{FormatError, FormatResult};
use pyfmt_core::FormatterConfig;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Flags passed to isort between the program and the extra arguments
pub const ISORT_ARGS: &[&str] = &[
    "--force-grid-wrap=0",
    "--line-width={line_length}",
    "--multi-line=3",
    "--use-parentheses",
    "--recursive",
    "--trailing-comma",
];

/// Flags passed to black between the program and the extra arguments
pub const BLACK_ARGS: &[&str] = &["--line-length={line_length}"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formatter {
    Isort,
    Black,
}

impl Formatter {
    /// Invocation order. Both tools rewrite files in place, so black always sees
    /// isort's output; import sorting must settle before black normalizes layout.
    pub const ORDER: [Formatter; 2] = [Formatter::Isort, Formatter::Black];

    pub fn name(&self) -> &'static str {
        match self {
            Formatter::Isort => "isort",
            Formatter::Black => "black",
        }
    }

    fn default_args(&self) -> &'static [&'static str] {
        match self {
            Formatter::Isort => ISORT_ARGS,
            Formatter::Black => BLACK_ARGS,
        }
    }

    fn default_check_flag(&self) -> &'static str {
        match self {
            Formatter::Isort => "--check-only",
            Formatter::Black => "--check",
        }
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values substituted into a formatter template for one run
#[derive(Debug, Clone)]
pub struct CommandParams<'a> {
    /// Shell-quoted file list, see [`paths_argument`]
    pub path: &'a str,
    pub line_length: usize,
    pub check: bool,
}

/// Immutable description of one formatter invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterSpec {
    pub kind: Formatter,
    /// Program followed by flags; ends with `{extra_args}` and `{path}`
    pub template: Vec<String>,
    pub check_flag: String,
    pub extra_args: String,
}

impl FormatterSpec {
    pub fn builtin(kind: Formatter) -> Self {
        Self::from_config(kind, None)
    }

    /// Built-in template with any configured overrides applied
    pub fn from_config(kind: Formatter, config: Option<&FormatterConfig>) -> Self {
        let config = config.cloned().unwrap_or_default();

        let mut template = vec![config.program.unwrap_or_else(|| kind.name().to_string())];
        match config.args {
            Some(args) => template.extend(args),
            None => template.extend(kind.default_args().iter().map(|a| a.to_string())),
        }
        if kind == Formatter::Black {
            if let Some(target) = config.target_version {
                template.push(format!("--target-version={}", target));
            }
        }
        template.push("{extra_args}".to_string());
        template.push("{path}".to_string());

        Self {
            kind,
            template,
            check_flag: config
                .check_flag
                .unwrap_or_else(|| kind.default_check_flag().to_string()),
            extra_args: config.extra_args.unwrap_or_default(),
        }
    }

    pub fn with_extra_args(mut self, extra_args: impl Into<String>) -> Self {
        self.extra_args = extra_args.into();
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Extra arguments for this run, with the check flag appended in check mode
    pub fn extra_args_for(&self, check: bool) -> String {
        if check {
            format!("{} {}", self.extra_args, self.check_flag)
        } else {
            self.extra_args.clone()
        }
    }

    pub fn command(&self, params: &CommandParams<'_>) -> FormatResult<Vec<String>> {
        let mut vars = HashMap::new();
        vars.insert("line_length", params.line_length.to_string());
        vars.insert("extra_args", self.extra_args_for(params.check));
        vars.insert("path", params.path.to_string());
        build_argv(&self.template, &vars)
    }
}

/// Quote each path so the file list survives shell-word splitting intact.
pub fn paths_argument<S: AsRef<str>>(paths: &[S]) -> String {
    shell_words::join(paths.iter().map(AsRef::as_ref))
}

// One pass: substituted values are never expanded again, unknown names stay as written.
fn substitute(template: &str, vars: &HashMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Substitute `{name}` placeholders, join, and split by shell-word rules.
///
/// Placeholders that expand to nothing leave no empty arguments behind.
pub fn build_argv(template: &[String], vars: &HashMap<&str, String>) -> FormatResult<Vec<String>> {
    let command = template
        .iter()
        .map(|part| substitute(part, vars))
        .collect::<Vec<_>>()
        .join(" ");

    let argv = shell_words::split(&command)
        .map_err(|source| FormatError::InvalidArguments {
            command: command.clone(),
            source,
        })?;

    if argv.is_empty() {
        return Err(FormatError::EmptyCommand);
    }
    tracing::debug!(?argv, "built formatter command");
    Ok(argv)
}
