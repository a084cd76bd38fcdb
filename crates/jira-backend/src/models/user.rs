use serde::{Deserialize, Serialize};

/// Jira user representation
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    /// User account ID (Jira Cloud uses account IDs, not usernames)
    pub account_id: Option<String>,
    /// User key (Jira Server / Data Center)
    pub key: Option<String>,
    /// Username (Jira Server / Data Center)
    pub name: Option<String>,
    /// Display name
    pub display_name: Option<String>,
    /// Email address (may not be visible depending on privacy settings)
    pub email_address: Option<String>,
    /// Whether the user is active
    #[serde(default)]
    pub active: bool,
}

impl JiraUser {
    /// Identifier used for username mapping: account id, else key, else name
    pub fn identifier(&self) -> Option<&str> {
        self.account_id
            .as_deref()
            .or(self.key.as_deref())
            .or(self.name.as_deref())
    }
}
