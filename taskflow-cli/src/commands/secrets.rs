//! Secrets file management commands

use clap::{Args, Subcommand};
use taskflow_core::Secrets;

/// Secrets management commands
#[derive(Args, Debug)]
pub struct SecretsArgs {
    #[command(subcommand)]
    pub command: SecretsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SecretsCommand {
    /// Create a secrets template at the default location
    Init,

    /// Show where secrets are read from
    Path,
}

impl SecretsArgs {
    /// Execute the secrets command
    pub fn execute(&self) -> anyhow::Result<()> {
        match self.command {
            SecretsCommand::Init => {
                let path = Secrets::create_template()?;
                println!("Created {}", path.display());
                println!("Add your GitLab token there, or set GITLAB_TOKEN instead.");
            }
            SecretsCommand::Path => match Secrets::default_secrets_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("(no config directory available)"),
            },
        }
        Ok(())
    }
}
