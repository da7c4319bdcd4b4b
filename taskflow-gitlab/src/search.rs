//! Issue search within a project

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::models::{GitlabIssue, SearchResultItem};
use crate::{GitLabClient, ProjectConfig, Result};

impl GitLabClient {
    /// Search the project's issues for `query`
    ///
    /// The query is a case-insensitive regular expression matched against
    /// title and body, so plain text matches as a substring. A query that is
    /// not a valid pattern matches nothing. Returns an empty list (after
    /// notifying the user) when no project is configured.
    pub async fn search_issues(
        &self,
        query: &str,
        cfg: &ProjectConfig,
    ) -> Result<Vec<SearchResultItem>> {
        if !self.ensure_configured(cfg) {
            return Ok(vec![]);
        }

        let issues = self.project_issues_with_comments(cfg).await?;
        let results: Vec<SearchResultItem> = filter_issues(issues, query)
            .into_iter()
            .map(SearchResultItem::from)
            .collect();

        debug!(query, count = results.len(), "Searched GitLab issues");
        Ok(results)
    }
}

fn filter_issues(issues: Vec<GitlabIssue>, query: &str) -> Vec<GitlabIssue> {
    let Some(pattern) = compile_query(query) else {
        return vec![];
    };
    issues
        .into_iter()
        .filter(|issue| pattern.is_match(&issue.title) || pattern.is_match(&issue.body))
        .collect()
}

fn compile_query(query: &str) -> Option<Regex> {
    RegexBuilder::new(query)
        .case_insensitive(true)
        .build()
        .inspect_err(|e| warn!(query, error = %e, "Invalid search pattern, nothing matches"))
        .ok()
}
