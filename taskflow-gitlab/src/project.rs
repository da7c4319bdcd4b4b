//! Project configuration and API address derivation

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// API base used when the project does not name its own GitLab host
pub const GITLAB_API_BASE_URL: &str = "https://gitlab.com/api/v4/projects";

/// Scheme and host prefix of a full project URL, including the slash that
/// follows the host
static GITLAB_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://[^/]+/").expect("valid host regex"));

/// Numeric project id, or `namespace/path` with any number of sub-groups
static GITLAB_PROJECT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[1-9][0-9]*|[\w.\-]+(?:(?:/|%2F)[\w.\-]+)+)$")
        .expect("valid project regex")
});

/// Identifies the GitLab project to read from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// `namespace/path`, or a full URL such as
    /// `https://gitlab.example.com/namespace/path`
    pub project: String,

    /// Personal access token, sent as a bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ProjectConfig {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Whether enough is configured to send any request
    pub fn is_configured(&self) -> bool {
        !self.project.trim().is_empty()
    }

    /// Address of the project resource, e.g.
    /// `https://gitlab.com/api/v4/projects/group%2Fproject`
    pub fn api_link(&self) -> Result<String> {
        let project = self.project.trim();

        let (api_base, path) = match GITLAB_URL_REGEX.find(project) {
            Some(host) => (
                format!("{}api/v4/projects/", host.as_str()),
                &project[host.end()..],
            ),
            None => (format!("{}/", GITLAB_API_BASE_URL), project),
        };
        let path = path.trim_end_matches('/');

        if !GITLAB_PROJECT_REGEX.is_match(path) {
            return Err(Error::Configuration(format!(
                "'{}' is not a valid project path, expected namespace/project",
                self.project
            )));
        }

        Ok(format!("{}{}", api_base, path.replace('/', "%2F")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_path_uses_default_base() {
        let link = ProjectConfig::new("group/project").api_link().unwrap();
        assert_eq!(link, "https://gitlab.com/api/v4/projects/group%2Fproject");
    }

    #[test]
    fn test_host_url_with_subgroups() {
        let link = ProjectConfig::new("https://gitlab.example.com/namespace/sub/path")
            .api_link()
            .unwrap();
        assert_eq!(
            link,
            "https://gitlab.example.com/api/v4/projects/namespace%2Fsub%2Fpath"
        );
    }

    #[test]
    fn test_host_url_with_port_and_http() {
        let link = ProjectConfig::new("http://127.0.0.1:8080/a/b")
            .api_link()
            .unwrap();
        assert_eq!(link, "http://127.0.0.1:8080/api/v4/projects/a%2Fb");
    }

    #[test]
    fn test_bare_path_with_subgroups_and_trailing_slash() {
        let link = ProjectConfig::new("namespace/sub/path/").api_link().unwrap();
        assert_eq!(
            link,
            "https://gitlab.com/api/v4/projects/namespace%2Fsub%2Fpath"
        );
    }

    #[test]
    fn test_numeric_project_id() {
        let link = ProjectConfig::new("12345").api_link().unwrap();
        assert_eq!(link, "https://gitlab.com/api/v4/projects/12345");
    }

    #[test]
    fn test_already_encoded_path() {
        let link = ProjectConfig::new("group%2Fproject").api_link().unwrap();
        assert_eq!(link, "https://gitlab.com/api/v4/projects/group%2Fproject");
    }

    #[test]
    fn test_invalid_paths_rejected() {
        for project in ["project-without-namespace", "group/pro ject", "https://gitlab.com/"] {
            let err = ProjectConfig::new(project).api_link().unwrap_err();
            assert!(matches!(err, Error::Configuration(_)), "{}", project);
        }
    }

    #[test]
    fn test_is_configured() {
        assert!(!ProjectConfig::default().is_configured());
        assert!(!ProjectConfig::new("   ").is_configured());
        assert!(ProjectConfig::new("a/b").is_configured());
    }
}
