//! Configuration management for taskflow
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (TASKFLOW_*)
//! 3. Config file (~/.config/taskflow/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Default request timeout for issue tracker calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// GitLab integration settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitLabSettings {
    /// Project to read issues from: `namespace/path` on gitlab.com, or a
    /// full URL such as `https://gitlab.example.com/namespace/path`
    pub project: Option<String>,

    /// Upper bound for a single API request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for GitLabSettings {
    fn default() -> Self {
        Self {
            project: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: "taskflow".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitLab configuration
    pub gitlab: GitLabSettings,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/taskflow/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("taskflow").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - TASKFLOW_GITLAB_PROJECT: GitLab project path or URL
    /// - TASKFLOW_REQUEST_TIMEOUT: request timeout, e.g. `45s`
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(project) = lookup("TASKFLOW_GITLAB_PROJECT") {
            self.gitlab.project = Some(project);
        }

        if let Some(raw) = lookup("TASKFLOW_REQUEST_TIMEOUT") {
            match humantime_serde::re::humantime::parse_duration(&raw) {
                Ok(timeout) => self.gitlab.request_timeout = timeout,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid TASKFLOW_REQUEST_TIMEOUT"),
            }
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, project: Option<String>, timeout: Option<Duration>) -> Self {
        if let Some(project) = project {
            self.gitlab.project = Some(project);
        }

        if let Some(timeout) = timeout {
            self.gitlab.request_timeout = timeout;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(project: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(project, timeout))
    }
}
