use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Source (Jira) records ====================

/// A Jira user as seen on an issue or comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUser {
    /// Account id on Jira Cloud, user key or name on Jira Server
    pub id: String,
    pub display_name: Option<String>,
}

impl SourceUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
        }
    }

    /// Human readable name, falling back to the id
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Jira status category, derived from `statusCategory.key`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    New,
    InProgress,
    Done,
    #[default]
    Unknown,
}

impl StatusCategory {
    pub fn from_key(key: &str) -> Self {
        match key {
            "new" => StatusCategory::New,
            "indeterminate" => StatusCategory::InProgress,
            "done" => StatusCategory::Done,
            _ => StatusCategory::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    /// Workflow state name, also the board column name (e.g. "In Review")
    pub name: String,
    pub category: StatusCategory,
}

/// Jira sprint, becomes a GitHub milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: Option<u64>,
    pub name: String,
    pub goal: Option<String>,
    /// "future", "active" or "closed"
    pub state: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Sprint {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            goal: None,
            state: None,
            end_date: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("closed"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceComment {
    pub author: Option<SourceUser>,
    pub created: Option<DateTime<Utc>>,
    /// Markdown body
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceProject {
    pub key: String,
    pub name: Option<String>,
}

impl SourceProject {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

/// Normalized Jira issue. Immutable once produced by the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIssue {
    /// Issue key (e.g. "PROJ-123")
    pub key: String,
    pub summary: String,
    /// Markdown description
    pub description: Option<String>,
    pub reporter: Option<SourceUser>,
    pub assignee: Option<SourceUser>,
    pub issue_type: String,
    pub status: SourceStatus,
    pub sprint: Option<Sprint>,
    pub labels: BTreeSet<String>,
    pub project: SourceProject,
    #[serde(default)]
    pub comments: Vec<SourceComment>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl SourceIssue {
    /// Minimal issue used as a starting point by tests and fixtures
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        let key = key.into();
        let project_key = key.split('-').next().unwrap_or_default().to_string();
        Self {
            key,
            summary: summary.into(),
            description: None,
            reporter: None,
            assignee: None,
            issue_type: "Task".to_string(),
            status: SourceStatus {
                name: "To Do".to_string(),
                category: StatusCategory::New,
            },
            sprint: None,
            labels: BTreeSet::new(),
            project: SourceProject {
                key: project_key,
                name: None,
            },
            comments: Vec::new(),
            created: None,
            updated: None,
        }
    }
}

// ==================== Target (GitHub) records ====================

/// Milestone requested by a target issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneSpec {
    pub title: String,
    pub description: Option<String>,
    pub due_on: Option<DateTime<Utc>>,
    pub closed: bool,
}

/// Project board placement: the card goes into `column` of `project`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardPlacement {
    pub project: String,
    pub column: String,
}

/// GitHub issue to be created for one source issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetIssue {
    pub source_key: String,
    pub title: String,
    pub body: String,
    /// GitHub login, only set when the Jira assignee is mapped
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub milestone: Option<MilestoneSpec>,
    pub board: Option<BoardPlacement>,
    pub closed: bool,
    /// Comment bodies to replay after creation, oldest first
    pub comments: Vec<String>,
}

// ==================== Remote GitHub objects ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMilestone {
    pub number: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLabel {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteProject {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteColumn {
    pub id: u64,
    pub name: String,
}

/// Issue creation request with milestone already resolved to its number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub title: String,
    pub body: String,
    pub assignee: Option<String>,
    pub labels: Vec<String>,
    pub milestone: Option<u64>,
}

/// Issue as returned by GitHub after creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    /// Global id, required for project cards
    pub id: u64,
    pub number: u64,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_category_from_key() {
        assert_eq!(StatusCategory::from_key("new"), StatusCategory::New);
        assert_eq!(
            StatusCategory::from_key("indeterminate"),
            StatusCategory::InProgress
        );
        assert_eq!(StatusCategory::from_key("done"), StatusCategory::Done);
        assert_eq!(StatusCategory::from_key("other"), StatusCategory::Unknown);
    }

    #[test]
    fn sprint_closed_state_is_case_insensitive() {
        let mut sprint = Sprint::named("Sprint 1");
        assert!(!sprint.is_closed());
        sprint.state = Some("CLOSED".into());
        assert!(sprint.is_closed());
    }

    #[test]
    fn new_issue_derives_project_key() {
        let issue = SourceIssue::new("PROJ-42", "Summary");
        assert_eq!(issue.project.key, "PROJ");
        assert_eq!(issue.project.display_name(), "PROJ");
    }

    #[test]
    fn user_name_falls_back_to_id() {
        let mut user = SourceUser::new("5b10a2844c20165700ede21g");
        assert_eq!(user.name(), "5b10a2844c20165700ede21g");
        user.display_name = Some("Bob".into());
        assert_eq!(user.name(), "Bob");
    }
}
