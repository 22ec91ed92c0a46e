//! CLI entry point for generating synthetic motif graphs.
//!
//! Parses arguments with clap, builds the requested graph, writes it to
//! stdout or a file, and maps failures to a non-zero exit code with a
//! structured error event carrying the stable error code.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use motifgraph_cli::{
    cli::{Cli, CliError, emit, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let generated = run_cli(cli).context("failed to generate graph")?;
    emit(&generated).context("failed to emit graph")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err
            .downcast_ref::<CliError>()
            .and_then(|cli_error| match cli_error {
                CliError::Graph(graph) => Some(graph.code()),
                _ => None,
            });
        error!(
            error = %format!("{err:#}"),
            code = code.map(|code| field::display(code.as_str())),
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
