//! Report persistence.
//!
//! Every run writes two aggregates into the reports directory: a labelled
//! `<label>_report.json` and a fixed `frontend_ready.json` the frontend
//! polls. Interactive runs additionally write one artifact per analyzed
//! file, named by sanitizing the file path.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::FRONTEND_REPORT;
use crate::models::IssueRecord;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes audit reports under a configured directory.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the labelled aggregate report and return its path.
    pub fn write_aggregate(
        &self,
        label: &str,
        issues: &[IssueRecord],
    ) -> Result<PathBuf, ReportError> {
        let path = self.dir.join(format!("{label}_report.json"));
        self.write_json(&path, issues)?;
        Ok(path)
    }

    /// Rewrite the fixed frontend report.
    pub fn write_frontend(&self, issues: &[IssueRecord]) -> Result<PathBuf, ReportError> {
        let path = self.dir.join(FRONTEND_REPORT);
        self.write_json(&path, issues)?;
        Ok(path)
    }

    /// Write a per-file artifact for one analyzed source file, named by
    /// sanitizing its extracted path.
    pub fn write_file_artifact(
        &self,
        source_path: &str,
        issues: &[IssueRecord],
    ) -> Result<PathBuf, ReportError> {
        let path = self.dir.join(format!("{}.json", sanitize_label(source_path)));
        self.write_json(&path, issues)?;
        Ok(path)
    }

    fn write_json(&self, path: &Path, issues: &[IssueRecord]) -> Result<(), ReportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ReportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let json = serde_json::to_string_pretty(issues)?;
        fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Collapse anything outside `[A-Za-z0-9]` to `_` so any path or label is a
/// safe filename.
pub fn sanitize_label(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
