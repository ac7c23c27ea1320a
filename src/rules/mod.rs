//! Ignore-rule store.
//!
//! Rules are plain filenames or fragments kept in a text file, one per line.
//! A missing file is seeded with the default list, so the rules are always
//! user-editable between runs. Matching is deliberately permissive: a file is
//! ignored when its name equals, ends with, or merely contains a rule
//! (case-insensitive). That means a rule like `server.js` also catches
//! `my_server.js` — edit the list if that is too broad.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Build-tool and scaffolding files that carry no application logic.
pub const DEFAULT_RULES: &[&str] = &[
    "vite.config.js",
    "vite.config.ts",
    "next.config.js",
    "next.config.ts",
    "webpack.config.js",
    "tailwind.config.ts",
    "tailwind.config.js",
    "vite-env.d.ts",
    "vite-env.d.js",
    "postcss.config.js",
    "eslint.config.js",
    "babel.config.js",
    "jest.config.js",
    "rollup.config.js",
    "nuxt.config.js",
    "astro.config.js",
    "server.js",
    "setupTests.js",
];

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("failed to access ignore list at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// On-disk rule list. Cheap to construct; rules are read from disk on every
/// [`RuleStore::load`] so edits take effect on the next collection pass.
#[derive(Debug, Clone)]
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current rules, seeding the file with [`DEFAULT_RULES`] if it
    /// does not exist yet.
    pub fn load(&self) -> Result<IgnoreRules, RuleError> {
        if !self.path.exists() {
            let seed = DEFAULT_RULES.join("\n") + "\n";
            fs::write(&self.path, seed).map_err(|source| RuleError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        let text = fs::read_to_string(&self.path).map_err(|source| RuleError::Io {
            path: self.path.clone(),
            source,
        })?;
        let patterns = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_lowercase)
            .collect();
        Ok(IgnoreRules { patterns })
    }
}

/// A loaded snapshot of the rule list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRules {
    patterns: Vec<String>,
}

impl IgnoreRules {
    /// True when `file_name` should be excluded from analysis.
    pub fn matches(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        self.patterns
            .iter()
            .any(|p| name == *p || name.ends_with(p) || name.contains(p))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
