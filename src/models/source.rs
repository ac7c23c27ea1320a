//! A collected source file awaiting analysis.

use std::path::{Path, PathBuf};

/// A JS/TS file picked up by the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path inside the extraction scratch directory.
    pub path: PathBuf,
    /// Path as presented in reports (relative to the archive root).
    pub display_name: String,
}

impl SourceFile {
    pub fn new(path: PathBuf, display_name: impl Into<String>) -> Self {
        Self {
            path,
            display_name: display_name.into(),
        }
    }

    /// Base name used as the `fileName` of issue records.
    pub fn file_name(&self) -> &str {
        Path::new(&self.display_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.display_name)
    }
}
