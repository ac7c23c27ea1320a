//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and remote URLs so a rename only touches this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "ecolens";

/// Crate version, surfaced by the `version` subcommand.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for outbound HTTP requests (GitHub rejects requests without
/// one).
pub const USER_AGENT: &str = concat!("ecolens/", env!("CARGO_PKG_VERSION"));

/// Repo-local config filename.
pub const CONFIG_FILENAME: &str = ".ecolens.toml";

/// Directory name under `~/.config/` holding the global config.
pub const CONFIG_DIR: &str = "ecolens";

/// Canonical GitHub web prefix; repository references must start with this.
pub const GITHUB_WEB_BASE: &str = "https://github.com/";

/// GitHub REST API base, used for the default-branch lookup.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Branches probed, in order, after the repository's reported default branch.
pub const FALLBACK_BRANCHES: &[&str] = &["main", "master", "develop", "dev"];

/// Default ignore-list filename (one pattern per line).
pub const IGNORE_FILENAME: &str = "ignore_list.txt";

/// Default reports directory.
pub const REPORTS_DIR: &str = "reports";

/// Fixed aggregate report filename, rewritten on every run.
pub const FRONTEND_REPORT: &str = "frontend_ready.json";

// Environment variable names recognised by the config loader.
pub const ENV_ENDPOINT: &str = "ECOLENS_ENDPOINT";
pub const ENV_API_KEY: &str = "ECOLENS_API_KEY";
pub const ENV_MODEL: &str = "ECOLENS_MODEL";
pub const ENV_REPORTS_DIR: &str = "ECOLENS_REPORTS_DIR";
pub const ENV_IGNORE_FILE: &str = "ECOLENS_IGNORE_FILE";
