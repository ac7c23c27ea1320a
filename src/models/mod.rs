//! Core data types shared across the pipeline.

pub mod issue;
pub mod source;

pub use issue::{IssueRecord, Summary};
pub use source::SourceFile;

use std::path::PathBuf;

/// What the user asked us to audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditInput {
    /// A public GitHub repository URL.
    RepoUrl(String),
    /// A local ZIP archive on disk.
    ArchiveFile(PathBuf),
}
