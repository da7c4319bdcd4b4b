//! Error types for GitLab operations

use thiserror::Error;

/// Result type for GitLab operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitLab operations
///
/// Every variant except [`Error::Client`] has already been shown to the user
/// through a notification by the time it is returned; see
/// [`Error::is_handled`].
#[derive(Error, Debug)]
pub enum Error {
    /// The project configuration cannot be turned into an API address
    #[error("GitLab: {0}")]
    Configuration(String),

    /// The request never got a response (connect failure, timeout, ...)
    #[error("GitLab: {0}")]
    Network(String),

    /// The server answered with a failure status or an unreadable body
    #[error("GitLab: {message}")]
    Remote { status: u16, message: String },

    /// The HTTP client could not be constructed
    #[error("Failed to create GitLab client: {0}")]
    Client(String),
}

impl Error {
    /// Whether the user has already been notified about this error, so
    /// top-level reporting should stay quiet
    pub fn is_handled(&self) -> bool {
        !matches!(self, Error::Client(_))
    }

    /// HTTP status for errors the server responded with
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
