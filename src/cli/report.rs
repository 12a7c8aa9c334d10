//! Report formatting and printing utilities.
//!
//! Separate from the pipeline so hackspot can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::args::SummaryFormat;
use crate::pipeline::RunSummary;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Print the run summary to stdout.
pub fn print_summary(summary: &RunSummary, format: SummaryFormat) {
    print_summary_to(summary, format, &mut io::stdout().lock());
}

/// Print the run summary to a custom writer.
pub fn print_summary_to<W: Write>(summary: &RunSummary, format: SummaryFormat, writer: &mut W) {
    match format {
        SummaryFormat::Text => print_text_summary(summary, writer),
        SummaryFormat::Json => match serde_json::to_string_pretty(summary) {
            Ok(json) => {
                let _ = writeln!(writer, "{}", json);
            }
            Err(err) => print_error_to(&err.into(), &mut io::stderr().lock()),
        },
    }
}

fn print_text_summary<W: Write>(summary: &RunSummary, writer: &mut W) {
    let archive_count = summary.archives.len();
    let msg = format!(
        "Wrote {} {} to {} ({} {} from {} {}, newest release {})",
        summary.entries,
        plural(summary.entries, "entry", "entries"),
        summary.output.display(),
        summary.messages,
        plural(summary.messages, "message", "messages"),
        archive_count,
        plural(archive_count, "archive", "archives"),
        summary.newest_release,
    );
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());

    if summary.stale_entries > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} not present in {}",
            "note:".bold(),
            summary.stale_entries,
            plural(summary.stale_entries, "entry is", "entries are"),
            summary.newest_release
        );
    }
}

/// Print a fatal error to stderr.
pub fn print_error(err: &anyhow::Error) {
    print_error_to(err, &mut io::stderr().lock());
}

/// Print a fatal error, with its context chain, to a custom writer.
pub fn print_error_to<W: Write>(err: &anyhow::Error, writer: &mut W) {
    let _ = writeln!(writer, "{} {:#}", "error:".bold().red(), err);
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
