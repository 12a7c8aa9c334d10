use std::fmt;

use serde::Serialize;

use crate::release::ReleaseId;

/// Position of an extracted string: path relative to the package directory
/// plus the 1-based line of the element's start tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRef {
    pub path: String,
    pub line: usize,
}

impl SourceRef {
    pub fn new(path: impl Into<String>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// A translatable string found in one configuration file of one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Disambiguating `msgctxt`, if any.
    pub context: Option<String>,
    pub text: String,
    pub source: SourceRef,
    pub release: ReleaseId,
}

impl Message {
    pub fn new(
        context: Option<String>,
        text: impl Into<String>,
        source: SourceRef,
        release: ReleaseId,
    ) -> Self {
        Self {
            context,
            text: text.into(),
            source,
            release,
        }
    }

    /// Deduplication key: messages with equal keys become one template entry.
    pub fn key(&self) -> (Option<&str>, &str) {
        (self.context.as_deref(), &self.text)
    }
}
