//! Classic repository projects: boards, columns and cards

use serde::{Deserialize, Serialize};

/// Repository project board
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubProject {
    pub id: u64,
    pub number: Option<u64>,
    pub name: String,
    pub body: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGitHubProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Column of a project board
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubColumn {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGitHubColumn {
    pub name: String,
}

/// Card linking an issue to a column
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubCard {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateGitHubCard {
    pub content_id: u64,
    /// Always "Issue" for migrated cards
    pub content_type: String,
}

impl CreateGitHubCard {
    pub fn for_issue(issue_id: u64) -> Self {
        Self {
            content_id: issue_id,
            content_type: "Issue".to_string(),
        }
    }
}
