//! GitLab wire shapes and taskflow's issue model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issue state as reported by GitLab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Opened,
    Closed,
    /// States newer GitLab versions may add
    #[serde(other)]
    Other,
}

/// User reference embedded in issues and notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitlabUser {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitlabMilestone {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Issue as returned by `GET /projects/:id/issues`
#[derive(Debug, Clone, Deserialize)]
pub struct GitlabOriginalIssue {
    pub id: u64,
    pub iid: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: IssueState,
    pub web_url: String,
    #[serde(default)]
    pub author: Option<GitlabUser>,
    #[serde(default)]
    pub assignee: Option<GitlabUser>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub milestone: Option<GitlabMilestone>,
    #[serde(default)]
    pub user_notes_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// Note as returned by `GET /projects/:id/issues/:iid/notes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitlabComment {
    pub id: u64,
    pub body: String,
    #[serde(default)]
    pub author: Option<GitlabUser>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Set for notes GitLab generates itself (label changes, ...)
    #[serde(default)]
    pub system: bool,
    #[serde(default)]
    pub noteable_iid: Option<u64>,
}

/// taskflow's view of a GitLab issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitlabIssue {
    /// Project-scoped issue number (`iid`); the notes endpoint is addressed
    /// by this value
    pub id: u64,
    /// Instance-wide issue id
    pub global_id: u64,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub state: IssueState,
    pub html_url: String,
    pub user: Option<GitlabUser>,
    pub assignee: Option<GitlabUser>,
    pub labels: Vec<String>,
    pub milestone: Option<GitlabMilestone>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub comments_nr: usize,
    pub comments: Vec<GitlabComment>,
    pub was_updated: bool,
}

impl From<GitlabOriginalIssue> for GitlabIssue {
    fn from(issue: GitlabOriginalIssue) -> Self {
        GitlabIssue {
            id: issue.iid,
            global_id: issue.id,
            number: issue.iid,
            title: issue.title,
            body: issue.description.unwrap_or_default(),
            state: issue.state,
            html_url: issue.web_url,
            user: issue.author,
            assignee: issue.assignee,
            labels: issue.labels,
            milestone: issue.milestone,
            created_at: issue.created_at,
            updated_at: issue.updated_at,
            closed_at: issue.closed_at,
            comments_nr: issue.user_notes_count,
            comments: vec![],
            was_updated: false,
        }
    }
}

impl GitlabIssue {
    /// New value with `comments` attached and the count updated
    pub fn with_comments(self, comments: Vec<GitlabComment>) -> Self {
        GitlabIssue {
            comments_nr: comments.len(),
            comments,
            ..self
        }
    }
}

/// Issue provider a search result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IssueProviderKey {
    Gitlab,
}

/// An issue projected for display in search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: String,
    pub issue_type: IssueProviderKey,
    pub issue_data: GitlabIssue,
}

impl From<GitlabIssue> for SearchResultItem {
    fn from(issue: GitlabIssue) -> Self {
        SearchResultItem {
            title: format!("#{} {}", issue.number, issue.title),
            issue_type: IssueProviderKey::Gitlab,
            issue_data: issue,
        }
    }
}
