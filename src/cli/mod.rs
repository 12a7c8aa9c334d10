use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, error::ErrorKind};

pub mod args;
mod exit_status;
mod report;

pub use args::{Arguments, SummaryFormat};
pub use exit_status::ExitStatus;
pub use report::{print_error, print_summary};

use crate::pipeline::{self, RunSummary};

/// Parse the process arguments.
///
/// Usage errors are printed here and map to [`ExitStatus::Failure`];
/// `--help` and `--version` map to [`ExitStatus::Success`].
pub fn parse_args() -> Result<Arguments, ExitCode> {
    Arguments::try_parse().map_err(|err| {
        let _ = err.print();
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitStatus::Success.into(),
            _ => ExitStatus::Failure.into(),
        }
    })
}

pub fn run_cli(args: &Arguments) -> Result<RunSummary> {
    let summary = pipeline::run(&args.run_options())?;
    report::print_summary(&summary, args.format);
    Ok(summary)
}
