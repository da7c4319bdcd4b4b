//! Taskflow Core - shared building blocks for taskflow
//!
//! This crate provides configuration and secrets loading plus the
//! notification capability that issue tracker integrations use to surface
//! problems to the user.

pub mod config;
pub mod error;
pub mod notify;
pub mod secrets;

pub use config::{Config, GitLabSettings};
pub use error::{Error, Result};
pub use notify::{LogNotifier, MemoryNotifier, Notification, Notifier, Severity};
pub use secrets::{GitLabSecrets, Secrets};
