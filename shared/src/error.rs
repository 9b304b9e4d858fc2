//! Error types for the calendar Lambda.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving a calendar request.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing credential, unusable settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Action called with the wrong HTTP method
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// ClickUp answered with a non-success status
    #[error("ClickUp error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// A ClickUp read failed; the remote status is not passed through
    #[error("ClickUp read failed ({status}): {message}")]
    UpstreamRead { status: u16, message: String },

    /// Transport failure talking to ClickUp
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::MethodNotAllowed(_) => 405,
            Error::Upstream { status, .. } if (400..600).contains(status) => *status,
            _ => 500,
        }
    }

    /// Reclassify a failed read so it answers 500 instead of the remote
    /// status. Only primary writes surface ClickUp's status to the caller.
    pub fn into_read_failure(self) -> Self {
        match self {
            Error::Upstream { status, message } => Error::UpstreamRead { status, message },
            other => other,
        }
    }
}
