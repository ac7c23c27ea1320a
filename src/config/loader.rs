//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. Environment variables
//! 2. `.ecolens.toml` in the working directory
//! 3. `~/.config/ecolens/config.toml` (global defaults)
//! 4. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants;
use crate::env::Env;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub audit: AuditConfig,
}

/// Chat-completions endpoint configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Bearer credential. No default; must be configured.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://lightning.ai/api/v1/chat/completions".to_string(),
            model: "openai/gpt-5-nano".to_string(),
            api_key: None,
        }
    }
}

/// Audit run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Directory reports are written to.
    pub reports_dir: PathBuf,
    /// Ignore-rule list location.
    pub ignore_file: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(constants::REPORTS_DIR),
            ignore_file: PathBuf::from(constants::IGNORE_FILENAME),
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads the global config, then the working-directory config, then
    /// applies environment variable overrides.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        if let Some(dir) = work_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one; `other` wins for any field that
    /// differs from the built-in default.
    fn merge(&mut self, other: Config) {
        let default_provider = ProviderConfig::default();
        if other.provider.endpoint != default_provider.endpoint {
            self.provider.endpoint = other.provider.endpoint;
        }
        if other.provider.model != default_provider.model {
            self.provider.model = other.provider.model;
        }
        if other.provider.api_key.is_some() {
            self.provider.api_key = other.provider.api_key;
        }

        let default_audit = AuditConfig::default();
        if other.audit.reports_dir != default_audit.reports_dir {
            self.audit.reports_dir = other.audit.reports_dir;
        }
        if other.audit.ignore_file != default_audit.ignore_file {
            self.audit.ignore_file = other.audit.ignore_file;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(constants::ENV_ENDPOINT) {
            self.provider.endpoint = val;
        }
        if let Ok(val) = env.var(constants::ENV_MODEL) {
            self.provider.model = val;
        }
        if let Ok(val) = env.var(constants::ENV_API_KEY) {
            self.provider.api_key = Some(val);
        }
        if let Ok(val) = env.var(constants::ENV_REPORTS_DIR) {
            self.audit.reports_dir = PathBuf::from(val);
        }
        if let Ok(val) = env.var(constants::ENV_IGNORE_FILE) {
            self.audit.ignore_file = PathBuf::from(val);
        }
    }
}
