use serde::{Deserialize, Serialize};

/// Project reference (used in issue responses)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraProjectRef {
    /// Internal ID
    pub id: Option<String>,
    /// Project key
    pub key: String,
    /// Project name
    pub name: Option<String>,
}
