//! Issue commands

use clap::{Args, Subcommand};
use taskflow_gitlab::{GitLabClient, GitlabIssue, IssueState, ProjectConfig};

/// Issue commands
#[derive(Args, Debug)]
pub struct IssueArgs {
    #[command(subcommand)]
    pub command: IssueCommand,
}

#[derive(Subcommand, Debug)]
pub enum IssueCommand {
    /// List the project's most recently updated issues
    List,

    /// Show issue details
    Show {
        /// Project-scoped issue number
        id: u64,

        /// Print the issue's comments as well
        #[arg(short, long)]
        comments: bool,
    },

    /// Search issue titles and descriptions
    Search {
        /// Case-insensitive pattern
        query: String,
    },
}

impl IssueArgs {
    /// Execute the issue command
    pub async fn execute(
        &self,
        client: &GitLabClient,
        cfg: &ProjectConfig,
        verbose: bool,
    ) -> anyhow::Result<()> {
        if verbose {
            println!("Using GitLab project {}", cfg.project);
        }

        match &self.command {
            IssueCommand::List => list_issues(client, cfg).await,
            IssueCommand::Show { id, comments } => show_issue(client, cfg, *id, *comments).await,
            IssueCommand::Search { query } => search_issues(client, cfg, query).await,
        }
    }
}

fn state_icon(state: &IssueState) -> &'static str {
    match state {
        IssueState::Opened => "○",
        IssueState::Closed => "●",
        IssueState::Other => "?",
    }
}

fn summary_line(issue: &GitlabIssue) -> String {
    let labels = if issue.labels.is_empty() {
        String::new()
    } else {
        format!(" [{}]", issue.labels.join(", "))
    };

    format!(
        "{} #{}: {}{} ({} comments)",
        state_icon(&issue.state),
        issue.number,
        issue.title,
        labels,
        issue.comments_nr
    )
}

async fn list_issues(client: &GitLabClient, cfg: &ProjectConfig) -> anyhow::Result<()> {
    let issues = client.fetch_project_issues(cfg).await?;

    if issues.is_empty() {
        println!("No issues found.");
        return Ok(());
    }

    println!("Issues in {} ({} found)", cfg.project, issues.len());
    println!();
    for issue in &issues {
        println!("{}", summary_line(issue));
    }

    Ok(())
}

async fn show_issue(
    client: &GitLabClient,
    cfg: &ProjectConfig,
    id: u64,
    with_comments: bool,
) -> anyhow::Result<()> {
    let Some(issue) = client.fetch_issue_by_id(id, cfg).await? else {
        println!("Issue #{} not found.", id);
        return Ok(());
    };

    println!("{}", summary_line(&issue));
    println!("  URL:     {}", issue.html_url);
    if let Some(ref author) = issue.user {
        println!("  Author:  {} (@{})", author.name, author.username);
    }
    if let Some(ref assignee) = issue.assignee {
        println!("  Assignee: @{}", assignee.username);
    }
    if let Some(ref milestone) = issue.milestone {
        println!("  Milestone: {}", milestone.title);
    }
    println!("  Created: {}", issue.created_at.format("%Y-%m-%d %H:%M"));
    println!("  Updated: {}", issue.updated_at.format("%Y-%m-%d %H:%M"));

    if !issue.body.is_empty() {
        println!();
        println!("{}", issue.body);
    }

    if with_comments {
        for comment in issue.comments.iter().filter(|c| !c.system) {
            let author = comment
                .author
                .as_ref()
                .map(|a| a.username.as_str())
                .unwrap_or("unknown");
            println!();
            println!(
                "--- @{} on {}",
                author,
                comment.created_at.format("%Y-%m-%d %H:%M")
            );
            println!("{}", comment.body);
        }
    }

    Ok(())
}

async fn search_issues(
    client: &GitLabClient,
    cfg: &ProjectConfig,
    query: &str,
) -> anyhow::Result<()> {
    let results = client.search_issues(query, cfg).await?;

    if results.is_empty() {
        println!("No issues match '{}'.", query);
        return Ok(());
    }

    for item in &results {
        println!("{}  {}", item.title, item.issue_data.html_url);
    }

    Ok(())
}
