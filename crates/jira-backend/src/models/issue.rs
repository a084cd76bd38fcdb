use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::comment::JiraCommentsResponse;
use super::project::JiraProjectRef;
use super::user::JiraUser;

/// Jira issue
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssue {
    /// Internal numeric ID
    pub id: String,
    /// Issue key (e.g., "PROJ-123")
    pub key: String,
    /// Issue fields
    pub fields: JiraIssueFields,
}

/// Issue fields container
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueFields {
    /// Issue summary/title
    pub summary: String,
    /// Issue description in ADF format (plain string on API v2)
    pub description: Option<serde_json::Value>,
    /// Issue status
    pub status: JiraStatus,
    /// Issue type
    pub issuetype: JiraIssueType,
    /// Project reference
    pub project: JiraProjectRef,
    /// Assignee
    pub assignee: Option<JiraUser>,
    /// Reporter
    pub reporter: Option<JiraUser>,
    /// Labels
    #[serde(default)]
    pub labels: Vec<String>,
    /// Creation timestamp
    pub created: Option<String>,
    /// Last update timestamp
    pub updated: Option<String>,
    /// Comments (only included when requested in `fields`)
    pub comment: Option<JiraCommentsResponse>,
    /// Custom fields, including the sprint field
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

/// Issue status
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraStatus {
    /// Status ID
    pub id: Option<String>,
    /// Status name
    pub name: String,
    /// Status category
    pub status_category: Option<JiraStatusCategory>,
}

/// Status category (used to determine if issue is resolved)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraStatusCategory {
    /// Category key (e.g., "done", "indeterminate", "new")
    pub key: String,
    /// Category name
    pub name: Option<String>,
}

/// Issue type
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraIssueType {
    /// Type ID
    pub id: Option<String>,
    /// Type name
    pub name: String,
    /// Whether this is a subtask type
    #[serde(default)]
    pub subtask: bool,
}

/// One page of `/search/jql` results.
///
/// Issues are kept as raw JSON so that one malformed issue does not take
/// the whole page down with it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraSearchPage {
    /// Starting index (offset pagination)
    #[serde(default)]
    pub start_at: usize,
    /// Maximum results per page
    #[serde(default)]
    pub max_results: usize,
    /// Total number of results (offset pagination only)
    pub total: Option<usize>,
    /// Cursor for the next page (token pagination)
    pub next_page_token: Option<String>,
    /// Set on the last page (token pagination)
    pub is_last: Option<bool>,
    /// Issues in this page
    #[serde(default)]
    pub issues: Vec<serde_json::Value>,
}

/// Position in a search result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    Start,
    Offset(usize),
    Token(String),
}
