use std::time::Duration;

use thiserror::Error;

/// Common errors for the Jira reader, the GitHub writer and the migration run
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Rate limited by {service}")]
    RateLimited {
        service: String,
        /// Server-provided wait time (Retry-After), if any
        retry_after: Option<Duration>,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// One source issue could not be read; the rest of the listing is fine
    #[error("Invalid issue {key}: {reason}")]
    InvalidIssue { key: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl MigrateError {
    /// Errors that must abort the whole run instead of the current issue
    pub fn is_fatal(&self) -> bool {
        matches!(self, MigrateError::Unauthorized(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, MigrateError::RateLimited { .. })
    }

    /// Key of the source issue this error belongs to, when known
    pub fn issue_key(&self) -> Option<&str> {
        match self {
            MigrateError::InvalidIssue { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MigrateError {
    fn from(err: std::io::Error) -> Self {
        MigrateError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
