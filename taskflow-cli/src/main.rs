//! taskflow CLI - issue tracker access from the command line

mod commands;

use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use taskflow_core::{Config, LogNotifier, Notification, Notifier, Secrets, Severity};
use taskflow_gitlab::{ClientOptions, GitLabClient, ProjectConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{IssueArgs, SecretsArgs};

/// taskflow: read issues from your issue tracker
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// GitLab project, `namespace/path` or full URL (overrides config and env)
    #[arg(long, global = true)]
    project: Option<String>,

    /// Request timeout in seconds (overrides config and env)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Work with GitLab issues
    #[command(visible_alias = "i")]
    Issue(IssueArgs),

    /// Manage the secrets file
    Secrets(SecretsArgs),

    /// Show current configuration
    Config,
}

/// Prints notifications to stderr as they arrive
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: Notification) {
        let prefix = match notification.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info | Severity::Success => "note",
        };
        eprintln!("{}: {}", prefix, notification);
    }
}

/// Notifications go to the terminal directly, or through the log when
/// stderr is redirected
fn notifier_for(stderr_is_terminal: bool) -> Arc<dyn Notifier> {
    if stderr_is_terminal {
        Arc::new(StderrNotifier)
    } else {
        Arc::new(LogNotifier)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Handled errors were already shown through the notifier
            if !is_handled(&err) {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn is_handled(err: &anyhow::Error) -> bool {
    err.downcast_ref::<taskflow_gitlab::Error>()
        .is_some_and(taskflow_gitlab::Error::is_handled)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = Config::load_with_overrides(
        cli.project.clone(),
        cli.timeout_secs.map(Duration::from_secs),
    )?;

    if cli.verbose {
        tracing::info!(
            project = ?config.gitlab.project,
            timeout = ?config.gitlab.request_timeout,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("taskflow {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Issue(args)) => {
            let secrets = Secrets::load()?;
            let cfg = ProjectConfig {
                project: config.gitlab.project.clone().unwrap_or_default(),
                token: secrets.gitlab_token(),
            };
            let client = GitLabClient::with_options(
                notifier_for(std::io::stderr().is_terminal()),
                ClientOptions {
                    timeout: config.gitlab.request_timeout,
                    user_agent: config.gitlab.user_agent.clone(),
                },
            )?;
            args.execute(&client, &cfg, cli.verbose).await?;
        }
        Some(Commands::Secrets(args)) => {
            args.execute()?;
        }
        Some(Commands::Config) => {
            print_config(&config);
        }
        None => {
            println!("taskflow - issue tracker access from the command line");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn print_config(config: &Config) {
    println!("taskflow Configuration");
    println!("======================");
    println!();
    println!("GitLab Settings:");
    println!(
        "  project: {}",
        config.gitlab.project.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  request_timeout: {}s",
        config.gitlab.request_timeout.as_secs_f64()
    );
    println!("  user_agent: {}", config.gitlab.user_agent);
    println!();

    for (label, path) in [
        ("Config file", Config::default_config_path()),
        ("Secrets file", Secrets::default_secrets_path()),
    ] {
        if let Some(path) = path {
            println!("{}: {}", label, path.display());
            if path.exists() {
                println!("  (exists)");
            } else {
                println!("  (not found)");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handled_errors_are_not_reported_twice() {
        let handled = anyhow::Error::new(taskflow_gitlab::Error::Network("down".into()));
        assert!(is_handled(&handled));

        let unhandled = anyhow::Error::new(taskflow_gitlab::Error::Client("tls".into()));
        assert!(!is_handled(&unhandled));

        assert!(!is_handled(&anyhow::anyhow!("something else")));
    }

    #[test]
    fn test_cli_parses_issue_show() {
        let cli = Cli::try_parse_from([
            "taskflow",
            "--project",
            "group/project",
            "issue",
            "show",
            "42",
            "--comments",
        ])
        .unwrap();
        assert_eq!(cli.project.as_deref(), Some("group/project"));
        assert!(matches!(cli.command, Some(Commands::Issue(_))));
    }
}
