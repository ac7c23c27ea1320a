//! The audit pipeline: resolve → collect → analyze → report.
//!
//! There is exactly one pipeline. The CLI and HTTP adapters differ only in
//! the [`PipelineOptions`] they pass: interactive runs analyze every
//! collected file and write per-file artifacts; service runs cap analysis at
//! the first few files and skip the artifacts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::analysis::Analyzer;
use crate::collector::{CollectError, FileCollector};
use crate::config::Config;
use crate::models::IssueRecord;
use crate::providers::CompletionProvider;
use crate::report::{ReportError, ReportStore};
use crate::resolver::{ArchiveResolver, ResolveError};
use crate::rules::RuleStore;

/// Per-request analysis cap applied by the HTTP service adapter.
pub const SERVICE_FILE_CAP: usize = 5;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error("no eligible JavaScript/TypeScript files found in the archive")]
    NoEligibleFiles,

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Knobs distinguishing the two pipeline adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Analyze at most this many files (`None` = all).
    pub max_files: Option<usize>,
    /// Write a JSON artifact per analyzed file.
    pub per_file_artifacts: bool,
}

impl PipelineOptions {
    /// CLI runs: every file, per-file artifacts.
    pub fn interactive() -> Self {
        Self {
            max_files: None,
            per_file_artifacts: true,
        }
    }

    /// HTTP runs: first [`SERVICE_FILE_CAP`] files, aggregates only.
    pub fn service() -> Self {
        Self {
            max_files: Some(SERVICE_FILE_CAP),
            per_file_artifacts: false,
        }
    }
}

/// Result of a finished audit.
#[derive(Debug)]
pub struct AuditOutcome {
    /// Label the report was filed under.
    pub label: String,
    /// Total eligible files collected (before any analysis cap).
    pub file_count: usize,
    /// Files excluded by ignore rules.
    pub skipped_count: usize,
    /// Path of the labelled aggregate report.
    pub report_path: PathBuf,
    /// All issue records, in analysis order.
    pub issues: Vec<IssueRecord>,
}

/// The one pipeline implementation behind both adapters.
pub struct AuditPipeline {
    resolver: ArchiveResolver,
    collector: FileCollector,
    analyzer: Analyzer,
    store: ReportStore,
    options: PipelineOptions,
}

impl AuditPipeline {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        config: &Config,
        options: PipelineOptions,
    ) -> Self {
        Self {
            resolver: ArchiveResolver::new(),
            collector: FileCollector::new(RuleStore::new(&config.audit.ignore_file)),
            analyzer: Analyzer::new(provider),
            store: ReportStore::new(&config.audit.reports_dir),
            options,
        }
    }

    /// Swap in a resolver pointed at different hosts.
    pub fn with_resolver(mut self, resolver: ArchiveResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Audit a GitHub repository by URL.
    pub async fn run_repo(&self, url: &str) -> Result<AuditOutcome, PipelineError> {
        let (archive, label) = self.resolver.resolve_from_github(url).await?;
        let outcome = self.run_archive(&archive, &label).await;
        std::fs::remove_file(&archive).ok();
        outcome
    }

    /// Audit an uploaded archive, already in memory.
    pub async fn run_archive_bytes(
        &self,
        bytes: &[u8],
        label: &str,
    ) -> Result<AuditOutcome, PipelineError> {
        let archive = self.resolver.from_uploaded_bytes(bytes)?;
        let outcome = self.run_archive(&archive, label).await;
        std::fs::remove_file(&archive).ok();
        outcome
    }

    /// Audit a ZIP archive on disk.
    pub async fn run_archive(
        &self,
        archive: &Path,
        label: &str,
    ) -> Result<AuditOutcome, PipelineError> {
        let collection = self.collector.collect(archive)?;
        if collection.files.is_empty() {
            return Err(PipelineError::NoEligibleFiles);
        }

        let file_count = collection.files.len();
        let cap = self.options.max_files.unwrap_or(file_count);
        tracing::info!(label, file_count, analyzing = file_count.min(cap), "starting audit");

        let mut issues = Vec::new();
        for file in collection.files.iter().take(cap) {
            let bytes = std::fs::read(&file.path).map_err(|source| PipelineError::Io {
                path: file.path.clone(),
                source,
            })?;
            // Lossy read: stray invalid bytes must not abort the audit.
            let content = String::from_utf8_lossy(&bytes);
            tracing::debug!(file = %file.display_name, "analyzing");

            let records = self.analyzer.analyze(&content, &file.display_name).await;
            if self.options.per_file_artifacts {
                // Artifact names come from the absolute extracted path, so
                // same-named files in different runs never collide.
                self.store
                    .write_file_artifact(&file.path.to_string_lossy(), &records)?;
            }
            issues.extend(records);
        }

        let report_path = self.store.write_aggregate(label, &issues)?;
        self.store.write_frontend(&issues)?;
        tracing::info!(label, issues = issues.len(), report = %report_path.display(), "audit complete");

        Ok(AuditOutcome {
            label: label.to_string(),
            file_count,
            skipped_count: collection.skipped,
            report_path,
            issues,
        })
    }
}
