//! Issue and comment fetching

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::models::{GitlabComment, GitlabIssue, GitlabOriginalIssue};
use crate::{GitLabClient, ProjectConfig, Result};

/// Page size for issue and comment listings (GitLab's maximum)
const PER_PAGE: u32 = 100;

/// Only the first page of issues and comments is read; projects with more
/// than [`PER_PAGE`] issues or notes per issue are truncated.
const FIRST_PAGE: u32 = 1;

impl GitLabClient {
    /// Fetch the project's most recently updated issues, each with its
    /// comments attached
    ///
    /// Issues 1 + N requests for N issues; comment requests run
    /// concurrently and any single failure fails the whole call. Returns an
    /// empty list (after notifying the user) when no project is configured.
    pub async fn fetch_project_issues(&self, cfg: &ProjectConfig) -> Result<Vec<GitlabIssue>> {
        if !self.ensure_configured(cfg) {
            return Ok(vec![]);
        }
        self.project_issues_with_comments(cfg).await
    }

    /// Find an issue by its project-scoped id
    ///
    /// Reads the whole first page of project issues and filters it; there is
    /// no direct lookup.
    pub async fn fetch_issue_by_id(
        &self,
        id: u64,
        cfg: &ProjectConfig,
    ) -> Result<Option<GitlabIssue>> {
        if !self.ensure_configured(cfg) {
            return Ok(None);
        }

        let issue = self
            .project_issues_with_comments(cfg)
            .await?
            .into_iter()
            .find(|issue| issue.id == id);

        debug!(id, found = issue.is_some(), "Looked up GitLab issue");
        Ok(issue)
    }

    /// Fetch the comments of `issue` and return it with them attached
    ///
    /// Returns `None` (after notifying the user) when no project is
    /// configured.
    pub async fn fetch_issue_with_comments(
        &self,
        issue: GitlabIssue,
        cfg: &ProjectConfig,
    ) -> Result<Option<GitlabIssue>> {
        if !self.ensure_configured(cfg) {
            return Ok(None);
        }
        self.attach_comments(issue, cfg).await.map(Some)
    }

    /// Project issues plus the join of all comment fetches; `cfg` must be
    /// configured
    pub(crate) async fn project_issues_with_comments(
        &self,
        cfg: &ProjectConfig,
    ) -> Result<Vec<GitlabIssue>> {
        let issues = self.project_issues(FIRST_PAGE, cfg).await?;
        if issues.is_empty() {
            return Ok(issues);
        }

        let issues = try_join_all(
            issues
                .into_iter()
                .map(|issue| self.attach_comments(issue, cfg)),
        )
        .await?;

        info!(project = %cfg.project, count = issues.len(), "Fetched GitLab issues");
        Ok(issues)
    }

    async fn attach_comments(&self, issue: GitlabIssue, cfg: &ProjectConfig) -> Result<GitlabIssue> {
        let comments = self.issue_comments(issue.id, FIRST_PAGE, cfg).await?;
        Ok(issue.with_comments(comments))
    }

    async fn project_issues(&self, page: u32, cfg: &ProjectConfig) -> Result<Vec<GitlabIssue>> {
        let url = self.endpoint(
            cfg,
            "issues",
            &[
                ("order_by", "updated_at".to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ],
        )?;

        let issues: Option<Vec<GitlabOriginalIssue>> = self.get_json(url, cfg).await?;
        Ok(issues
            .unwrap_or_default()
            .into_iter()
            .map(GitlabIssue::from)
            .collect())
    }

    async fn issue_comments(
        &self,
        issue_id: u64,
        page: u32,
        cfg: &ProjectConfig,
    ) -> Result<Vec<GitlabComment>> {
        let url = self.endpoint(
            cfg,
            &format!("issues/{}/notes", issue_id),
            &[
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ],
        )?;

        let comments: Option<Vec<GitlabComment>> = self.get_json(url, cfg).await?;
        let comments = comments.unwrap_or_default();
        debug!(issue_id, count = comments.len(), "Fetched GitLab issue comments");
        Ok(comments)
    }
}
