//! Archive resolution: turn a repository reference into a ZIP on disk.
//!
//! GitHub URLs are resolved by asking the API for the default branch, then
//! probing a short list of branch candidates for a downloadable
//! `archive/refs/heads/<branch>.zip`. The first branch that yields a usable
//! archive wins; any failure during an attempt (bad status, connection drop,
//! truncated body) just moves probing to the next candidate. Uploaded
//! archives bypass all of this and are written to a temp file verbatim.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{FALLBACK_BRANCHES, GITHUB_API_BASE, GITHUB_WEB_BASE, USER_AGENT};

/// Timeout for the default-branch metadata lookup.
const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for each branch archive download attempt.
const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid repository URL: {0}")]
    InvalidUrl(String),

    #[error("could not download an archive for {repo} from any candidate branch")]
    DownloadFailed { repo: String },

    #[error("failed to persist archive: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed `owner/name` GitHub repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse a GitHub web URL. Only `https://github.com/<owner>/<name>`
    /// (optionally with a trailing `.git` or extra path segments) is
    /// accepted.
    pub fn parse(url: &str) -> Result<Self, ResolveError> {
        let trimmed = url.trim();
        let rest = trimmed
            .strip_prefix(GITHUB_WEB_BASE)
            .ok_or_else(|| ResolveError::InvalidUrl(trimmed.to_string()))?;
        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let owner = segments.next().unwrap_or_default();
        let name = segments
            .next()
            .unwrap_or_default()
            .trim_end_matches(".git");
        if owner.is_empty() || name.is_empty() {
            return Err(ResolveError::InvalidUrl(trimmed.to_string()));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

/// Branch names to try, starting with the repository's reported default
/// branch (when known), de-duplicated, order preserved.
pub fn branch_candidates(default: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(FALLBACK_BRANCHES.len() + 1);
    for branch in default
        .into_iter()
        .chain(FALLBACK_BRANCHES.iter().copied())
    {
        if !candidates.iter().any(|c| c.as_str() == branch) {
            candidates.push(branch.to_string());
        }
    }
    candidates
}

/// Downloads repository archives.
#[derive(Debug, Clone)]
pub struct ArchiveResolver {
    client: reqwest::Client,
    web_base: String,
    api_base: String,
}

impl Default for ArchiveResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveResolver {
    pub fn new() -> Self {
        Self::with_bases(GITHUB_WEB_BASE, GITHUB_API_BASE)
    }

    /// Build a resolver against custom download/metadata hosts. URL
    /// validation in [`RepoRef::parse`] is unaffected; only where archives
    /// and branch metadata are fetched from changes.
    pub fn with_bases(web_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        // Timeouts are set per request; metadata and archive fetches differ.
        Self {
            client: reqwest::Client::new(),
            web_base: web_base.into().trim_end_matches('/').to_string(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a GitHub URL to a local ZIP file. Returns the archive path
    /// and the report label (the repository name).
    pub async fn resolve_from_github(&self, url: &str) -> Result<(PathBuf, String), ResolveError> {
        let repo = RepoRef::parse(url)?;
        let default = self.default_branch(&repo).await;
        tracing::debug!(
            repo = %format!("{}/{}", repo.owner, repo.name),
            default_branch = default.as_deref().unwrap_or("(unknown)"),
            "resolving repository archive"
        );

        for branch in branch_candidates(default.as_deref()) {
            let archive_url = format!(
                "{}/{}/{}/archive/refs/heads/{branch}.zip",
                self.web_base, repo.owner, repo.name
            );
            let response = self
                .client
                .get(&archive_url)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .timeout(ARCHIVE_TIMEOUT)
                .send()
                .await;
            // Any failure in the attempt moves on to the next candidate.
            match response {
                Ok(resp) if resp.status().is_success() => match resp.bytes().await {
                    Ok(bytes) => match persist_archive(&bytes) {
                        Ok(path) => {
                            tracing::info!(branch = %branch, bytes = bytes.len(), "downloaded archive");
                            return Ok((path, repo.name.clone()));
                        }
                        Err(e) => {
                            tracing::warn!(branch = %branch, error = %e, "failed to persist archive");
                        }
                    },
                    Err(e) => {
                        tracing::debug!(branch = %branch, error = %e, "failed to read archive body");
                    }
                },
                Ok(resp) => {
                    tracing::debug!(branch = %branch, status = %resp.status(), "branch not available");
                }
                Err(e) => {
                    tracing::debug!(branch = %branch, error = %e, "archive request failed");
                }
            }
        }

        Err(ResolveError::DownloadFailed {
            repo: format!("{}/{}", repo.owner, repo.name),
        })
    }

    /// Write uploaded archive bytes to a temp file, untouched.
    pub fn from_uploaded_bytes(&self, bytes: &[u8]) -> Result<PathBuf, ResolveError> {
        Ok(persist_archive(bytes)?)
    }

    /// Ask the GitHub API for the repository's default branch. Any failure
    /// (network, non-200, unexpected body) degrades to `None`; the fallback
    /// branch list covers the common cases.
    async fn default_branch(&self, repo: &RepoRef) -> Option<String> {
        let url = format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.name);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(METADATA_TIMEOUT)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: serde_json::Value = response.json().await.ok()?;
        body["default_branch"].as_str().map(str::to_string)
    }
}

/// Persist archive bytes to a kept temp file with a `.zip` suffix.
fn persist_archive(bytes: &[u8]) -> Result<PathBuf, std::io::Error> {
    let mut file = tempfile::Builder::new()
        .prefix("ecolens-archive-")
        .suffix(".zip")
        .tempfile()?;
    file.write_all(bytes)?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_accepts_plain_repo_url() {
        let repo = RepoRef::parse("https://github.com/octocat/hello-world").unwrap();
        assert_eq!(repo.owner, "octocat");
        assert_eq!(repo.name, "hello-world");
    }

    #[test]
    fn parse_strips_git_suffix_and_extra_segments() {
        let repo = RepoRef::parse("https://github.com/octocat/hello-world.git").unwrap();
        assert_eq!(repo.name, "hello-world");

        let repo = RepoRef::parse("https://github.com/octocat/hello-world/tree/main").unwrap();
        assert_eq!(repo.name, "hello-world");
    }

    #[test]
    fn parse_rejects_non_github_urls() {
        assert!(matches!(
            RepoRef::parse("https://gitlab.com/a/b"),
            Err(ResolveError::InvalidUrl(_))
        ));
        assert!(matches!(
            RepoRef::parse("not a url"),
            Err(ResolveError::InvalidUrl(_))
        ));
    }

    #[test]
    fn parse_rejects_missing_owner_or_name() {
        assert!(RepoRef::parse("https://github.com/").is_err());
        assert!(RepoRef::parse("https://github.com/only-owner").is_err());
    }

    #[test]
    fn candidates_start_with_default_branch() {
        let c = branch_candidates(Some("trunk"));
        assert_eq!(c, vec!["trunk", "main", "master", "develop", "dev"]);
    }

    #[test]
    fn candidates_dedupe_default_against_fallbacks() {
        let c = branch_candidates(Some("master"));
        assert_eq!(c, vec!["master", "main", "develop", "dev"]);
    }

    #[test]
    fn candidates_without_default_are_the_fallback_list() {
        let c = branch_candidates(None);
        assert_eq!(c, vec!["main", "master", "develop", "dev"]);
    }

    #[test]
    fn custom_bases_are_normalized() {
        let resolver = ArchiveResolver::with_bases("http://localhost:9/", "http://localhost:9/");
        assert_eq!(resolver.web_base, "http://localhost:9");
        assert_eq!(resolver.api_base, "http://localhost:9");
    }

    #[test]
    fn uploaded_bytes_are_written_verbatim() {
        let resolver = ArchiveResolver::new();
        let path = resolver.from_uploaded_bytes(b"PK\x03\x04fake").unwrap();
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, b"PK\x03\x04fake");
        std::fs::remove_file(path).ok();
    }
}
