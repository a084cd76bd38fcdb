use std::time::Duration;

use migrate_core::MigrateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JiraError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid issue {key}: {reason}")]
    InvalidIssue { key: String, reason: String },

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, JiraError>;

impl From<JiraError> for MigrateError {
    fn from(err: JiraError) -> Self {
        match err {
            JiraError::Http(e) => MigrateError::Http(e.to_string()),
            JiraError::Parse(e) => MigrateError::MalformedResponse(format!("Jira: {}", e)),
            JiraError::InvalidIssue { key, reason } => MigrateError::InvalidIssue { key, reason },
            JiraError::Unauthorized => MigrateError::Unauthorized(
                "Jira rejected the username/API token".to_string(),
            ),
            JiraError::RateLimited { retry_after } => MigrateError::RateLimited {
                service: "Jira".to_string(),
                retry_after,
            },
            JiraError::Api { status, message } => MigrateError::Api { status, message },
        }
    }
}
