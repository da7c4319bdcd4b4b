//! Secrets management for taskflow
//!
//! Access tokens live apart from the configuration so the config file can be
//! shared safely. The secrets file is `~/.config/taskflow/secrets.toml` and
//! must have restrictive permissions (0600 on Unix).
//!
//! Loading priority:
//! 1. Environment variables (GITLAB_TOKEN)
//! 2. Secrets file (~/.config/taskflow/secrets.toml)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// GitLab configuration
    pub gitlab: GitLabSecrets,
}

/// GitLab-related secrets
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitLabSecrets {
    /// GitLab personal access token
    pub token: Option<String>,
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_secrets_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mode = std::fs::metadata(path)?.permissions().mode();

            // Readable by group or others
            if mode & 0o077 != 0 {
                return Err(Error::Secrets(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
        }

        let contents = std::fs::read_to_string(path)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Secrets(format!("Failed to parse secrets: {}", e)))?;

        if let Some(ref mut token) = secrets.gitlab.token {
            *token = token.trim().to_string();
        }

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/taskflow/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("taskflow").join("secrets.toml"))
    }

    /// Get GitLab token with environment variable override
    ///
    /// Priority: GITLAB_TOKEN env var > secrets file
    pub fn gitlab_token(&self) -> Option<String> {
        self.gitlab_token_from(std::env::var("GITLAB_TOKEN").ok())
    }

    fn gitlab_token_from(&self, env_token: Option<String>) -> Option<String> {
        if let Some(token) = env_token {
            let token = token.trim().to_string();
            if !token.is_empty() {
                debug!("Using GitLab token from GITLAB_TOKEN environment variable");
                return Some(token);
            }
        }

        match self.gitlab.token {
            Some(ref token) if !token.is_empty() => {
                debug!("Using GitLab token from secrets file");
                Some(token.clone())
            }
            _ => None,
        }
    }

    /// Create a template secrets file at the default location
    pub fn create_template() -> Result<PathBuf> {
        let path = Self::default_secrets_path()
            .ok_or_else(|| Error::Secrets("Could not determine secrets path".to_string()))?;
        Self::create_template_at(&path)?;
        Ok(path)
    }

    /// Create a template secrets file at `path`
    ///
    /// Creates parent directories if needed and sets secure permissions.
    /// An existing file is never overwritten.
    pub fn create_template_at(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if path.exists() {
            return Err(Error::Secrets(format!(
                "Secrets file already exists at {}",
                path.display()
            )));
        }

        let template = r#"# taskflow secrets
# This file contains sensitive credentials - do not share or commit to version control
#
# IMPORTANT: This file must have restrictive permissions (chmod 600)

[gitlab]
# GitLab personal access token with the read_api scope
# Create at: https://gitlab.com/-/user_settings/personal_access_tokens
token = ""
"#;

        std::fs::write(path, template)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        warn!(path = %path.display(), "Created secrets template - please edit and add your token");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_secrets() {
        let secrets = Secrets::default();
        assert!(secrets.gitlab.token.is_none());
    }

    #[test]
    fn test_parse_secrets() {
        let toml = r#"
[gitlab]
token = "glpat-xxxxxxxxxxxx"
"#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.gitlab.token.as_deref(), Some("glpat-xxxxxxxxxxxx"));
    }

    #[cfg(unix)]
    #[test]
    fn test_insecure_permissions_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[gitlab]\ntoken = \"test\"").unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = Secrets::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("insecure permissions"));
    }

    #[cfg(unix)]
    #[test]
    fn test_secure_permissions_accepted_and_trimmed() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[gitlab]\ntoken = \"  glpat-test  \"").unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600)).unwrap();

        let secrets = Secrets::load_from_file(file.path()).unwrap();
        assert_eq!(secrets.gitlab.token.as_deref(), Some("glpat-test"));
    }

    #[test]
    fn test_env_token_takes_priority() {
        let secrets = Secrets {
            gitlab: GitLabSecrets {
                token: Some("from_file".to_string()),
            },
        };

        assert_eq!(
            secrets.gitlab_token_from(Some(" from_env ".to_string())).as_deref(),
            Some("from_env")
        );
        assert_eq!(
            secrets.gitlab_token_from(Some("   ".to_string())).as_deref(),
            Some("from_file")
        );
        assert_eq!(secrets.gitlab_token_from(None).as_deref(), Some("from_file"));
    }

    #[test]
    fn test_empty_file_token_is_none() {
        let secrets = Secrets {
            gitlab: GitLabSecrets {
                token: Some(String::new()),
            },
        };
        assert!(secrets.gitlab_token_from(None).is_none());
    }

    #[test]
    fn test_create_template_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("taskflow").join("secrets.toml");

        Secrets::create_template_at(&path).unwrap();
        let secrets = Secrets::load_from_file(&path).unwrap();
        assert_eq!(secrets.gitlab.token.as_deref(), Some(""));

        let err = Secrets::create_template_at(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
