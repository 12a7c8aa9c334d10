//! End-to-end run: unpack archives, extract, aggregate, write the template.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::{
    archive::Scratch,
    catalog::Catalog,
    config::RunOptions,
    extract::extract_file,
    pot::write_template_file,
    release::ReleaseId,
};

/// What one archive contributed to the run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveSummary {
    pub archive: PathBuf,
    pub release: ReleaseId,
    pub config_files: usize,
    pub messages: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub output: PathBuf,
    pub archives: Vec<ArchiveSummary>,
    pub messages: usize,
    pub entries: usize,
    /// Entries whose newest release is older than `newest_release`.
    pub stale_entries: usize,
    pub newest_release: ReleaseId,
}

pub fn run(options: &RunOptions) -> Result<RunSummary> {
    let scratch = Scratch::create(&options.scratch_dir)?;

    let mut messages = Vec::new();
    let mut archives = Vec::with_capacity(options.archives.len());

    for archive in &options.archives {
        let release = ReleaseId::from_archive_path(archive)?;
        if options.verbose {
            eprintln!("Unpacking {} (release {})", archive.display(), release);
        }

        let staged = scratch.unpack(archive)?;
        let config_files = staged.config_files()?;
        let before = messages.len();

        for file in &config_files {
            let relative_path = staged.relative_path(file);
            let found = extract_file(file, &relative_path, release)?;
            if options.verbose {
                eprintln!("  {}: {} message(s)", relative_path, found.len());
            }
            messages.extend(found);
        }

        archives.push(ArchiveSummary {
            archive: archive.clone(),
            release,
            config_files: config_files.len(),
            messages: messages.len() - before,
        });
        staged.remove()?;
    }

    scratch.close()?;

    let message_count = messages.len();
    let catalog = Catalog::from_messages(messages);
    write_template_file(&catalog, &options.output)?;

    Ok(RunSummary {
        output: options.output.clone(),
        archives,
        messages: message_count,
        entries: catalog.len(),
        stale_entries: catalog.stale_count(),
        newest_release: catalog.newest,
    })
}
