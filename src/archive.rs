//! Unpacking of source distribution archives into a scratch directory.
//!
//! Every archive is unpacked into the same scratch root, which must then hold
//! exactly one top-level directory (the package directory). The package
//! directory is removed again once its configuration files have been read, so
//! the next archive starts from an empty root.

use std::{
    fs::{self, File},
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use glob::{MatchOptions, Pattern};

use crate::config::{CONFIG_PATTERN, config_dir};

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";

/// Compression wrapped around the tar stream, detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Bzip2,
    None,
}

impl Compression {
    pub fn detect(header: &[u8]) -> Self {
        if header.starts_with(GZIP_MAGIC) {
            Compression::Gzip
        } else if header.starts_with(BZIP2_MAGIC) {
            Compression::Bzip2
        } else {
            Compression::None
        }
    }
}

/// Scratch directory exclusively owned by one run.
///
/// Any pre-existing content at the root is deleted on creation. The root is
/// removed by [`Scratch::close`], or on drop if the run bailed out early.
#[derive(Debug)]
pub struct Scratch {
    root: PathBuf,
    closed: bool,
}

impl Scratch {
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.is_dir() {
            fs::remove_dir_all(&root).with_context(|| {
                format!("Failed to remove scratch directory: {}", root.display())
            })?;
        } else if root.exists() {
            fs::remove_file(&root)
                .with_context(|| format!("Failed to remove scratch path: {}", root.display()))?;
        }
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create scratch directory: {}", root.display()))?;

        Ok(Self {
            root,
            closed: false,
        })
    }

    /// Unpack `archive` and locate its single top-level package directory.
    pub fn unpack(&self, archive: &Path) -> Result<StagedRelease> {
        let mut tar = open_archive(archive)?;
        tar.unpack(&self.root)
            .with_context(|| format!("Failed to unpack archive '{}'", archive.display()))?;

        let mut entries = list_matching(&self.root, "*")?;
        if entries.len() != 1 {
            bail!(
                "There should be only one top-level item in archive '{}'.",
                archive.display()
            );
        }
        let source_root = entries.remove(0);
        if !source_root.is_dir() {
            bail!(
                "The top-level item in archive '{}' is not a directory.",
                archive.display()
            );
        }

        Ok(StagedRelease { source_root })
    }

    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        fs::remove_dir_all(&self.root).with_context(|| {
            format!("Failed to remove scratch directory: {}", self.root.display())
        })
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if !self.closed {
            let _ = fs::remove_dir_all(&self.root);
        }
    }
}

/// The unpacked package directory of one archive.
#[derive(Debug)]
pub struct StagedRelease {
    source_root: PathBuf,
}

impl StagedRelease {
    /// All `hacks/config/*.xml` files, sorted by path.
    pub fn config_files(&self) -> Result<Vec<PathBuf>> {
        let dir = config_dir(&self.source_root);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = list_matching(&dir, CONFIG_PATTERN)?;
        files.sort();
        Ok(files)
    }

    /// Path of `file` relative to the package directory, `/`-separated.
    pub fn relative_path(&self, file: &Path) -> String {
        let relative = file.strip_prefix(&self.source_root).unwrap_or(file);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn remove(self) -> Result<()> {
        fs::remove_dir_all(&self.source_root).with_context(|| {
            format!(
                "Failed to remove unpacked directory: {}",
                self.source_root.display()
            )
        })
    }
}

fn open_archive(path: &Path) -> Result<tar::Archive<Box<dyn Read>>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open archive: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let header = reader
        .fill_buf()
        .with_context(|| format!("Failed to read archive: {}", path.display()))?;

    let stream: Box<dyn Read> = match Compression::detect(header) {
        Compression::Gzip => Box::new(GzDecoder::new(reader)),
        Compression::Bzip2 => Box::new(BzDecoder::new(reader)),
        Compression::None => Box::new(reader),
    };
    Ok(tar::Archive::new(stream))
}

/// Non-hidden entries of `dir` whose name matches `pattern`.
fn list_matching(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    glob::glob_with(&full, options)
        .with_context(|| format!("Invalid glob pattern: \"{}\"", full))?
        .map(|entry| entry.context("Failed to read directory entry"))
        .collect()
}
