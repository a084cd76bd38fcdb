use serde::{Deserialize, Serialize};

/// GitHub milestone
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubMilestone {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    pub due_on: Option<String>,
}

/// Request body for creating a milestone
#[derive(Debug, Clone, Serialize)]
pub struct CreateGitHubMilestone {
    pub title: String,
    /// "open" or "closed"
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO 8601 timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}
