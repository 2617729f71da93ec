use crate::cli::CommitMode;
use anyhow::Result;
use pyfmt_core::Config;
use pyfmt_format::{
    execute, paths_argument, CommandParams, ContentSnapshot, Formatter, FormatterSpec,
};
use pyfmt_vcs::{CommitFiles, CommitRequest, SelectionPolicy, Selector, Vcs};
use std::io::Write;

/// Settings for one formatting run, after config and CLI are merged
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub path: String,
    pub select: SelectionPolicy,
    pub check: bool,
    pub commit: CommitMode,
    pub message: Option<String>,
    pub line_length: usize,
}

/// Formatter specs from config, with command-line extra arguments taking precedence
pub fn formatter_specs(
    config: &Config,
    extra_isort_args: Option<String>,
    extra_black_args: Option<String>,
) -> Vec<FormatterSpec> {
    Formatter::ORDER
        .iter()
        .map(|&kind| {
            let (section, extra) = match kind {
                Formatter::Isort => (config.formatters.isort.as_ref(), extra_isort_args.clone()),
                Formatter::Black => (config.formatters.black.as_ref(), extra_black_args.clone()),
            };
            let spec = FormatterSpec::from_config(kind, section);
            match extra {
                Some(extra) => spec.with_extra_args(extra),
                None => spec,
            }
        })
        .collect()
}

pub struct Orchestrator<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    formatters: Vec<FormatterSpec>,
    extensions: Vec<String>,
}

impl<'a, V: Vcs + ?Sized> Orchestrator<'a, V> {
    /// Formatters are reordered to follow [`Formatter::ORDER`].
    pub fn new(vcs: &'a V, mut formatters: Vec<FormatterSpec>, extensions: Vec<String>) -> Self {
        formatters.sort_by_key(|spec| Formatter::ORDER.iter().position(|k| *k == spec.kind));
        Self {
            vcs,
            formatters,
            extensions,
        }
    }

    /// Select files, run every formatter over them and optionally commit.
    ///
    /// Returns the first non-zero formatter exit code, or 0. Selection failures are
    /// returned as errors before any formatter runs.
    pub fn run<W: Write>(&self, options: &RunOptions, out: &mut W) -> Result<i32> {
        let files =
            Selector::new(self.vcs, &self.extensions).select(options.select, &options.path)?;
        if files.is_empty() {
            writeln!(out, "Nothing to do.")?;
            return Ok(0);
        }
        writeln!(out, "{}", files.join(" "))?;

        let commit_wanted = options.commit.is_requested() && !options.check;
        if options.commit.is_requested() && options.check {
            tracing::warn!("--commit is ignored in check mode");
        }
        let snapshot = (commit_wanted && options.select != SelectionPolicy::All)
            .then(|| ContentSnapshot::capture(&files));

        let path = paths_argument(&files);
        let params = CommandParams {
            path: &path,
            line_length: options.line_length,
            check: options.check,
        };

        let mut exit_code = 0;
        for spec in &self.formatters {
            let code = self.run_formatter(spec, &params, out)?;
            if exit_code == 0 {
                exit_code = code;
            }
        }

        if commit_wanted {
            if exit_code == 0 {
                self.commit(options, snapshot.as_ref(), out)?;
            } else {
                tracing::info!(exit_code, "skipping commit after formatter failure");
            }
        }

        Ok(exit_code)
    }

    fn run_formatter<W: Write>(
        &self,
        spec: &FormatterSpec,
        params: &CommandParams<'_>,
        out: &mut W,
    ) -> Result<i32> {
        match spec.command(params).and_then(|argv| execute(&argv)) {
            Ok(result) => {
                writeln!(out, "{}", result.report())?;
                Ok(result.exit_code)
            }
            Err(e) => {
                tracing::error!(formatter = spec.name(), "{}", e);
                writeln!(out, "{}: {}", spec.name(), e)?;
                Ok(e.exit_code())
            }
        }
    }

    fn commit<W: Write>(
        &self,
        options: &RunOptions,
        snapshot: Option<&ContentSnapshot>,
        out: &mut W,
    ) -> Result<()> {
        let patch = options.commit == CommitMode::Patch;
        let files = match snapshot {
            None => CommitFiles::All,
            Some(snapshot) => {
                let changed = snapshot.changed();
                if changed.is_empty() {
                    writeln!(out, "No files changed, nothing to commit.")?;
                    return Ok(());
                }
                // Untracked files must be known to git before a path-limited commit.
                if let Err(e) = self.vcs.add(&changed, patch) {
                    tracing::error!("{}", e);
                    writeln!(out, "{}", e)?;
                    return Ok(());
                }
                CommitFiles::Paths(changed)
            }
        };

        let request = CommitRequest {
            files,
            patch,
            amend: options.commit == CommitMode::Amend,
            message: options.message.clone(),
        };
        if let Err(e) = self.vcs.commit(&request) {
            tracing::error!("{}", e);
            writeln!(out, "{}", e)?;
        }
        Ok(())
    }
}
