use std::time::Duration;

use migrate_core::MigrateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited { retry_after: Option<Duration> },

    /// 422 Unprocessable Entity: GitHub rejected the request body
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, GitHubError>;

impl From<GitHubError> for MigrateError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Http(e) => MigrateError::Http(e.to_string()),
            GitHubError::Parse(e) => MigrateError::MalformedResponse(format!("GitHub: {}", e)),
            GitHubError::NotFound(what) => MigrateError::NotFound(what),
            GitHubError::Unauthorized => MigrateError::Unauthorized(
                "GitHub rejected the access token".to_string(),
            ),
            GitHubError::RateLimited { retry_after } => MigrateError::RateLimited {
                service: "GitHub".to_string(),
                retry_after,
            },
            GitHubError::Validation(message) => MigrateError::Validation(message),
            GitHubError::Api { status, message } => MigrateError::Api { status, message },
        }
    }
}
