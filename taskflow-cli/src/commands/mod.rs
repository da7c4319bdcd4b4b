//! CLI command implementations

pub mod issue;
pub mod secrets;

pub use issue::IssueArgs;
pub use secrets::SecretsArgs;
