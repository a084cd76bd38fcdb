//! Field mapping from Jira issues to GitHub issues
//!
//! Everything here is pure: the same source issue and username map always
//! produce the same target issue.

use chrono::{DateTime, Utc};

use crate::models::*;
use crate::users::UsernameMap;

/// Map a Jira issue onto the GitHub issue that will replace it.
///
/// Unmapped assignees are dropped: the issue is created unassigned and the
/// original assignee is recorded in the body instead.
pub fn map_issue(source: &SourceIssue, users: &UsernameMap) -> TargetIssue {
    let assignee = source
        .assignee
        .as_ref()
        .and_then(|user| users.get(&user.id))
        .map(str::to_string);

    TargetIssue {
        source_key: source.key.clone(),
        title: source.summary.trim().to_string(),
        body: issue_body(source, users, assignee.is_some()),
        assignee,
        labels: issue_labels(source),
        milestone: source.sprint.as_ref().map(sprint_to_milestone),
        board: board_placement(source),
        closed: source.status.category == StatusCategory::Done,
        comments: source
            .comments
            .iter()
            .map(|c| comment_body(c, users))
            .collect(),
    }
}

pub fn sprint_to_milestone(sprint: &Sprint) -> MilestoneSpec {
    MilestoneSpec {
        title: sprint.name.trim().to_string(),
        description: sprint
            .goal
            .as_ref()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty()),
        due_on: sprint.end_date,
        closed: sprint.is_closed(),
    }
}

/// Issue type first, then the Jira labels; case-insensitive duplicates dropped
fn issue_labels(source: &SourceIssue) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    let candidates = std::iter::once(source.issue_type.as_str())
        .chain(source.labels.iter().map(String::as_str));

    for name in candidates {
        let name = name.trim();
        if name.is_empty() || labels.iter().any(|l| l.eq_ignore_ascii_case(name)) {
            continue;
        }
        labels.push(name.to_string());
    }
    labels
}

fn board_placement(source: &SourceIssue) -> Option<BoardPlacement> {
    let column = source.status.name.trim();
    if column.is_empty() {
        return None;
    }
    Some(BoardPlacement {
        project: source.project.display_name().to_string(),
        column: column.to_string(),
    })
}

fn issue_body(source: &SourceIssue, users: &UsernameMap, assignee_mapped: bool) -> String {
    let mut body = format!("Migrated from Jira issue {}\n", source.key);

    let mut meta = Vec::new();
    if let Some(reporter) = &source.reporter {
        meta.push(format!("> Reporter: {}", user_reference(reporter, users)));
    }
    if let Some(created) = &source.created {
        meta.push(format!("> Created: {}", format_timestamp(created)));
    }
    if let Some(assignee) = source.assignee.as_ref().filter(|_| !assignee_mapped) {
        meta.push(format!(
            "> Jira assignee: {} (no GitHub account mapped)",
            assignee.name()
        ));
    }
    if !meta.is_empty() {
        body.push('\n');
        body.push_str(&meta.join("\n"));
        body.push('\n');
    }

    if let Some(description) = source
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        body.push('\n');
        body.push_str(description);
        body.push('\n');
    }

    body
}

fn comment_body(comment: &SourceComment, users: &UsernameMap) -> String {
    let author = comment
        .author
        .as_ref()
        .map(|a| user_reference(a, users))
        .unwrap_or_else(|| "Unknown".to_string());
    let created = comment
        .created
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "Unknown".to_string());

    format!("Author: {}\nCreated: {}\n\n{}", author, created, comment.body.trim())
}

/// Display name plus GitHub login when mapped, without an @ so nobody is pinged
fn user_reference(user: &SourceUser, users: &UsernameMap) -> String {
    match users.get(&user.id) {
        Some(login) => format!("{} ({})", user.name(), login),
        None => user.name().to_string(),
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}
