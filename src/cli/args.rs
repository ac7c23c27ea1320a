//! Clap argument types and input validation.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::models::{AuditInput, IssueRecord};
use crate::output::{json::JsonRenderer, terminal::TerminalRenderer, ReportRenderer};

/// Sustainability audit for JavaScript/TypeScript repositories.
#[derive(Parser, Debug)]
#[command(name = "ecolens", version = crate::constants::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Audit a repository or archive and print the report.
    Audit(AuditArgs),

    /// Run the HTTP analysis service.
    Serve(ServeArgs),

    /// Manage the ignore-rule list.
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Print version information.
    Version,
}

/// Arguments for the `audit` subcommand.
#[derive(Parser, Debug)]
pub struct AuditArgs {
    // --- Input (exactly one required) ---
    /// Public GitHub repository URL to audit.
    #[arg(long)]
    pub repo: Option<String>,

    /// Local ZIP archive to audit.
    #[arg(long)]
    pub archive: Option<PathBuf>,

    // --- Behavior ---
    /// Analyze at most this many files (default: all).
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Skip per-file report artifacts (aggregates are always written).
    #[arg(long, default_value_t = false)]
    pub no_file_artifacts: bool,

    // --- Output ---
    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,
}

impl AuditArgs {
    /// Resolve `--repo`/`--archive` into a single input. Exactly one must be
    /// given.
    pub fn validate_input(&self) -> Result<AuditInput, String> {
        match (&self.repo, &self.archive) {
            (Some(url), None) => Ok(AuditInput::RepoUrl(url.clone())),
            (None, Some(path)) => Ok(AuditInput::ArchiveFile(path.clone())),
            (Some(_), Some(_)) => Err("--repo and --archive are mutually exclusive".to_string()),
            (None, None) => Err("one of --repo or --archive is required".to_string()),
        }
    }
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub addr: String,
}

/// Ignore-rule subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum RulesAction {
    /// Print the active ignore rules.
    List,
    /// Print the ignore-list file path.
    Path,
}

/// Report output formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    pub fn render(&self, issues: &[IssueRecord]) -> String {
        match self {
            OutputFormat::Terminal => TerminalRenderer.render(issues),
            OutputFormat::Json => JsonRenderer.render(issues),
        }
    }
}
