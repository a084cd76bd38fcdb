//! Model conversions from Jira wire types to migration records

use chrono::{DateTime, Utc};
use migrate_core::{
    SourceComment, SourceIssue, SourceProject, SourceStatus, SourceUser, StatusCategory,
};

use crate::adf::adf_to_markdown;
use crate::error::{JiraError, Result};
use crate::models::*;
use crate::sprint::parse_sprint_field;

/// Validate a Jira issue and turn it into a [`SourceIssue`].
///
/// Comments are taken from `fields.comment`; the reader completes them
/// first when Jira truncated the embedded list.
pub fn to_source_issue(issue: JiraIssue, sprint_field: &str) -> Result<SourceIssue> {
    let JiraIssue { key, fields, .. } = issue;

    let invalid = |reason: &str| JiraError::InvalidIssue {
        key: key.clone(),
        reason: reason.to_string(),
    };

    if key.trim().is_empty() {
        return Err(invalid("empty issue key"));
    }
    let summary = fields.summary.trim().to_string();
    if summary.is_empty() {
        return Err(invalid("empty summary"));
    }
    if fields.project.key.trim().is_empty() {
        return Err(invalid("missing project key"));
    }

    let description = fields
        .description
        .as_ref()
        .map(adf_to_markdown)
        .filter(|s| !s.is_empty());

    let category = fields
        .status
        .status_category
        .as_ref()
        .map(|c| StatusCategory::from_key(&c.key))
        .unwrap_or_default();

    let sprint = fields.custom.get(sprint_field).and_then(parse_sprint_field);

    let comments = fields
        .comment
        .map(|c| c.comments.into_iter().map(to_source_comment).collect())
        .unwrap_or_default();

    Ok(SourceIssue {
        key,
        summary,
        description,
        reporter: fields.reporter.as_ref().and_then(to_source_user),
        assignee: fields.assignee.as_ref().and_then(to_source_user),
        issue_type: fields.issuetype.name,
        status: SourceStatus {
            name: fields.status.name,
            category,
        },
        sprint,
        labels: fields.labels.into_iter().collect(),
        project: SourceProject {
            key: fields.project.key,
            name: fields.project.name,
        },
        comments,
        created: parse_jira_datetime(fields.created.as_deref()),
        updated: parse_jira_datetime(fields.updated.as_deref()),
    })
}

/// A user without any identifier cannot be mapped and is dropped
pub fn to_source_user(user: &JiraUser) -> Option<SourceUser> {
    Some(SourceUser {
        id: user.identifier()?.to_string(),
        display_name: user.display_name.clone(),
    })
}

pub fn to_source_comment(comment: JiraComment) -> SourceComment {
    SourceComment {
        author: comment.author.as_ref().and_then(to_source_user),
        created: parse_jira_datetime(comment.created.as_deref()),
        body: adf_to_markdown(&comment.body),
    }
}

/// Parse a Jira timestamp.
///
/// Jira uses `2024-01-15T10:30:00.000+0000` (no colon in the offset), which
/// RFC 3339 parsing rejects, so both forms are tried.
pub fn parse_jira_datetime(dt: Option<&str>) -> Option<DateTime<Utc>> {
    let s = dt?.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn issue_json() -> serde_json::Value {
        json!({
            "id": "10001",
            "key": "PROJ-1",
            "fields": {
                "summary": "  Fix login  ",
                "description": {
                    "type": "doc",
                    "version": 1,
                    "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Broken"}]}]
                },
                "status": {"name": "In Progress", "statusCategory": {"key": "indeterminate"}},
                "issuetype": {"name": "Bug"},
                "project": {"id": "10000", "key": "PROJ", "name": "Project"},
                "assignee": {"accountId": "jira_bob", "displayName": "Bob"},
                "reporter": {"displayName": "Ghost"},
                "labels": ["ui", "auth"],
                "created": "2024-01-15T10:30:00.000+0000",
                "updated": "2024-01-16T08:00:00.000+0000",
                "comment": {
                    "comments": [{
                        "id": "1",
                        "body": "plain body",
                        "author": {"accountId": "jira_carol", "displayName": "Carol"},
                        "created": "2024-01-15T11:00:00.000+0000"
                    }],
                    "total": 1
                },
                "customfield_10020": [{"id": 4, "name": "Sprint 4", "state": "active"}]
            }
        })
    }

    #[test]
    fn converts_full_issue() {
        let issue: JiraIssue = serde_json::from_value(issue_json()).unwrap();
        let source = to_source_issue(issue, "customfield_10020").unwrap();

        assert_eq!(source.key, "PROJ-1");
        assert_eq!(source.summary, "Fix login");
        assert_eq!(source.description.as_deref(), Some("Broken"));
        assert_eq!(source.status.category, StatusCategory::InProgress);
        assert_eq!(source.issue_type, "Bug");
        assert_eq!(source.assignee.as_ref().unwrap().id, "jira_bob");
        // Reporter without any identifier is dropped
        assert_eq!(source.reporter, None);
        assert_eq!(source.sprint.as_ref().unwrap().name, "Sprint 4");
        assert!(source.labels.contains("auth"));
        assert_eq!(source.project.display_name(), "Project");
        assert_eq!(source.comments.len(), 1);
        assert_eq!(source.comments[0].body, "plain body");
        assert_eq!(
            source.created,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn other_sprint_field_is_ignored() {
        let issue: JiraIssue = serde_json::from_value(issue_json()).unwrap();
        let source = to_source_issue(issue, "customfield_10104").unwrap();
        assert_eq!(source.sprint, None);
    }

    #[test]
    fn empty_summary_is_rejected() {
        let mut value = issue_json();
        value["fields"]["summary"] = json!("   ");
        let issue: JiraIssue = serde_json::from_value(value).unwrap();

        let err = to_source_issue(issue, "customfield_10020").unwrap_err();

        assert!(matches!(err, JiraError::InvalidIssue { ref key, .. } if key == "PROJ-1"));
    }

    #[test]
    fn parses_both_timestamp_forms() {
        let expected = Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
        assert_eq!(parse_jira_datetime(Some("2024-01-15T10:30:00.000+0000")), expected);
        assert_eq!(parse_jira_datetime(Some("2024-01-15T10:30:00Z")), expected);
        assert_eq!(parse_jira_datetime(Some("2024-01-15T12:30:00.000+0200")), expected);
        assert_eq!(parse_jira_datetime(Some("yesterday")), None);
        assert_eq!(parse_jira_datetime(None), None);
    }
}
