//! Error types for taskflow

use thiserror::Error;

/// Result type alias for taskflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for taskflow core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Secrets error
    #[error("Secrets error: {0}")]
    Secrets(String),
}
