use serde::{Deserialize, Serialize};

/// GitHub user (minimal representation)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
}

/// GitHub issue, as returned after create or update
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubIssue {
    /// Global id; project cards refer to issues by this id
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    pub html_url: Option<String>,
    pub assignee: Option<GitHubUser>,
}

/// Request body for creating a GitHub issue
#[derive(Debug, Clone, Serialize)]
pub struct CreateGitHubIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

/// Request body for updating a GitHub issue
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateGitHubIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// "completed" or "not_planned", only meaningful with `state: closed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_reason: Option<String>,
}

impl UpdateGitHubIssue {
    pub fn close_completed() -> Self {
        Self {
            state: Some("closed".to_string()),
            state_reason: Some("completed".to_string()),
        }
    }
}

/// Repository metadata, used to check access before a run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default = "default_true")]
    pub has_issues: bool,
    #[serde(default)]
    pub has_projects: bool,
}

fn default_true() -> bool {
    true
}
