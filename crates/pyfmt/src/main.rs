//! pyfmt: run isort and black over the Python files selected by git status.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use commands::{formatter_specs, Orchestrator, RunOptions};
use pyfmt_core::{init_logging, Config};
use pyfmt_vcs::{GitCli, SelectionPolicy};
use std::path::Path;

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = Config::load(cli.config.as_deref())?;
    let _guard = init_logging(&cli.log_level, config.log_file.as_deref().map(Path::new))?;
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    // An unknown selector in a config file fails here, before any subprocess runs.
    let select = match cli.select {
        Some(select) => select,
        None => config.select().parse::<SelectionPolicy>()?,
    };

    let options = RunOptions {
        path: cli.path,
        select,
        check: cli.check,
        commit: cli.commit,
        message: cli.message,
        line_length: cli.line_length.unwrap_or_else(|| config.line_length()),
    };
    tracing::debug!(?options, "resolved options");

    let formatters = formatter_specs(&config, cli.extra_isort_args, cli.extra_black_args);
    let git = GitCli::new();
    let orchestrator = Orchestrator::new(&git, formatters, config.extensions());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    orchestrator.run(&options, &mut out)
}
