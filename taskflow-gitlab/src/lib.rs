//! Taskflow GitLab - GitLab issue tracker integration for taskflow
//!
//! This crate reads a project's issues and their comments from the GitLab
//! REST API, maps them into taskflow's issue model and reports failures to
//! the user through a [`taskflow_core::Notifier`].

mod client;
mod error;
mod issues;
mod models;
mod project;
mod search;

pub use client::{
    ClientOptions, GitLabClient, MSG_NETWORK, MSG_NOT_CONFIGURED, MSG_REQUEST_FAILED,
};
pub use error::{Error, Result};
pub use models::{
    GitlabComment, GitlabIssue, GitlabMilestone, GitlabOriginalIssue, GitlabUser, IssueProviderKey,
    IssueState, SearchResultItem,
};
pub use project::{ProjectConfig, GITLAB_API_BASE_URL};
