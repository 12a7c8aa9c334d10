//! Release identifiers derived from source distribution archive names.

use std::{fmt, path::Path};

use anyhow::{Result, anyhow};
use serde::Serialize;

/// A `(major, minor)` release of the upstream source distribution.
///
/// Ordering is lexicographic on `(major, minor)`, so `5.9 < 5.10 < 6.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReleaseId {
    pub major: u32,
    pub minor: u32,
}

impl ReleaseId {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse the release out of an archive path shaped like
    /// `<name>-<major>.<minor>.tar.<suffix>`.
    ///
    /// Only the base name is inspected. Positions are located from the right:
    /// the last `.tar`, the `.` before it, then the `-` before that.
    pub fn from_archive_path(path: &Path) -> Result<Self> {
        let base = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        parse_archive_name(&base).ok_or_else(|| {
            anyhow!(
                "Archive file name '{}' not in the form '*-X.Y.tar.*'.",
                path.display()
            )
        })
    }
}

fn parse_archive_name(base: &str) -> Option<ReleaseId> {
    let tar_pos = base.rfind(".tar")?;
    let dot_pos = base.get(..tar_pos.checked_sub(1)?)?.rfind('.')?;
    let dash_pos = base.get(..dot_pos.checked_sub(1)?)?.rfind('-')?;

    let major = base[dash_pos + 1..dot_pos].parse().ok()?;
    let minor = base[dot_pos + 1..tar_pos].parse().ok()?;
    Some(ReleaseId::new(major, minor))
}

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
