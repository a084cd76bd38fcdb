use serde::{Deserialize, Serialize};

use super::user::JiraUser;

/// Jira comment
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraComment {
    /// Comment ID
    pub id: String,
    /// Comment body in ADF (Atlassian Document Format) or plain text
    pub body: serde_json::Value,
    /// Comment author
    pub author: Option<JiraUser>,
    /// Creation timestamp
    pub created: Option<String>,
    /// Last update timestamp
    pub updated: Option<String>,
}

/// Paged comment listing, also embedded in issues as `fields.comment`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraCommentsResponse {
    #[serde(default)]
    pub comments: Vec<JiraComment>,
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub max_results: usize,
    #[serde(default)]
    pub total: usize,
}

impl JiraCommentsResponse {
    /// Whether Jira embedded fewer comments than the issue has
    pub fn is_truncated(&self) -> bool {
        self.total > self.start_at + self.comments.len()
    }
}
