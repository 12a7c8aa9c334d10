//! CLI argument definitions using clap.
//!
//! ```text
//! hackspot [OPTIONS] <OUTPUT> <ARCHIVE>...
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::RunOptions;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Path of the PO template to write (overwritten if it exists)
    pub output: PathBuf,

    /// XScreenSaver source distributions, named like xscreensaver-X.Y.tar.gz
    #[arg(required = true)]
    pub archives: Vec<PathBuf>,

    /// Print per-archive and per-file progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Format of the summary printed on success
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub format: SummaryFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    Text,
    Json,
}

impl Arguments {
    pub fn run_options(&self) -> RunOptions {
        RunOptions::new(&self.output, self.archives.clone()).with_verbose(self.verbose)
    }
}
