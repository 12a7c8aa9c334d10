use std::path::{Path, PathBuf};

/// Scratch directory, relative to the working directory, that archives are
/// unpacked into. Removed before and after every run.
pub const SCRATCH_DIR_NAME: &str = "xscreensaver-unpacked";

/// Location of the hack configuration files inside a source distribution.
pub const CONFIG_SUBDIR: &[&str] = &["hacks", "config"];

/// File pattern of hack configuration files inside [`CONFIG_SUBDIR`].
pub const CONFIG_PATTERN: &str = "*.xml";

/// Options for a single extraction run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Where the PO template is written.
    pub output: PathBuf,
    /// Source distribution archives, in command-line order.
    pub archives: Vec<PathBuf>,
    /// Scratch directory root. The CLI always uses [`SCRATCH_DIR_NAME`].
    pub scratch_dir: PathBuf,
    pub verbose: bool,
}

impl RunOptions {
    pub fn new(output: impl Into<PathBuf>, archives: Vec<PathBuf>) -> Self {
        Self {
            output: output.into(),
            archives,
            scratch_dir: default_scratch_dir(),
            verbose: false,
        }
    }

    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

pub fn default_scratch_dir() -> PathBuf {
    Path::new(".").join(SCRATCH_DIR_NAME)
}

/// Directory holding the hack configuration files of an unpacked distribution.
pub fn config_dir(source_root: &Path) -> PathBuf {
    CONFIG_SUBDIR
        .iter()
        .fold(source_root.to_path_buf(), |path, part| path.join(part))
}
