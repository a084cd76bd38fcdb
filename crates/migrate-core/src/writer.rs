//! GitHub writer: create-if-absent for milestones, labels and project
//! boards, then issue creation.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{MigrateError, Result};
use crate::models::*;
use crate::retry::{with_retry, RetryConfig};
use crate::traits::IssueTarget;

/// GitHub's limit on issue title length, in characters
pub const MAX_TITLE_CHARS: usize = 256;

/// GitHub's limit on issue and comment body length, in characters
pub const MAX_BODY_CHARS: usize = 65_536;

#[derive(Debug, Clone, Copy)]
enum MilestoneEntry {
    Available(u64),
    /// Creating the milestone failed; issues in this sprint go without one
    Unavailable,
}

/// Sprint title -> milestone number
#[derive(Debug, Default)]
pub struct MilestoneCache {
    loaded: bool,
    entries: HashMap<String, MilestoneEntry>,
}

impl MilestoneCache {
    pub fn get(&self, title: &str) -> Option<u64> {
        match self.entries.get(title) {
            Some(MilestoneEntry::Available(number)) => Some(*number),
            _ => None,
        }
    }

    pub fn is_unavailable(&self, title: &str) -> bool {
        matches!(self.entries.get(title), Some(MilestoneEntry::Unavailable))
    }

    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, MilestoneEntry::Available(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Label names, keyed case-insensitively the way GitHub compares them
#[derive(Debug, Default)]
pub struct LabelCache {
    loaded: bool,
    names: HashMap<String, String>,
    /// Lowercased names whose creation failed
    unavailable: HashSet<String>,
}

impl LabelCache {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.names.get(&name.to_lowercase()).map(String::as_str)
    }

    fn insert(&mut self, name: String) {
        self.names.insert(name.to_lowercase(), name);
    }

    pub fn is_unavailable(&self, name: &str) -> bool {
        self.unavailable.contains(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug)]
enum ProjectEntry {
    Available {
        id: u64,
        /// Column name -> id, loaded on first placement
        columns: Option<HashMap<String, u64>>,
    },
    /// Creating the project failed; placement is skipped for the rest of the run
    Unavailable,
}

/// Project name -> project board and its columns
#[derive(Debug, Default)]
pub struct BoardCache {
    loaded: bool,
    projects: HashMap<String, ProjectEntry>,
}

/// Result of writing one issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub source_key: String,
    pub number: u64,
    pub url: Option<String>,
    /// Labels or milestone left off, and steps that failed after the issue
    /// was created
    pub warnings: Vec<String>,
}

/// Writes target issues into one repository, remembering every milestone,
/// label and project it has seen or created during the run.
pub struct GitHubWriter<'a> {
    target: &'a dyn IssueTarget,
    retry: RetryConfig,
    place_on_boards: bool,
    milestones: MilestoneCache,
    labels: LabelCache,
    boards: BoardCache,
}

impl<'a> GitHubWriter<'a> {
    pub fn new(target: &'a dyn IssueTarget, retry: RetryConfig) -> Self {
        Self {
            target,
            retry,
            place_on_boards: true,
            milestones: MilestoneCache::default(),
            labels: LabelCache::default(),
            boards: BoardCache::default(),
        }
    }

    /// Enable or disable project board placement
    pub fn with_boards(mut self, enabled: bool) -> Self {
        self.place_on_boards = enabled;
        self
    }

    pub fn milestones(&self) -> &MilestoneCache {
        &self.milestones
    }

    pub fn labels(&self) -> &LabelCache {
        &self.labels
    }

    /// Check an issue against GitHub's limits before any API call
    pub fn validate(issue: &TargetIssue) -> Result<()> {
        let title_len = issue.title.chars().count();
        if title_len == 0 {
            return Err(MigrateError::Validation("title is empty".to_string()));
        }
        if title_len > MAX_TITLE_CHARS {
            return Err(MigrateError::Validation(format!(
                "title is {} characters, GitHub allows {}",
                title_len, MAX_TITLE_CHARS
            )));
        }
        let body_len = issue.body.chars().count();
        if body_len > MAX_BODY_CHARS {
            return Err(MigrateError::Validation(format!(
                "body is {} characters, GitHub allows {}",
                body_len, MAX_BODY_CHARS
            )));
        }
        Ok(())
    }

    /// Create one issue with its labels, milestone, state, comments and
    /// board card.
    ///
    /// A label or milestone that cannot be created is left off the issue
    /// with a warning. Other errors before the issue exists fail the whole
    /// call. Errors after it exists are returned as warnings, unless they
    /// are fatal.
    pub fn write(&mut self, issue: &TargetIssue) -> Result<WriteOutcome> {
        Self::validate(issue)?;

        let mut warnings = Vec::new();

        let mut labels = Vec::with_capacity(issue.labels.len());
        for name in &issue.labels {
            match self.ensure_label(name)? {
                Some(label) => labels.push(label),
                None => warnings.push(format!("label {} unavailable, left off", name)),
            }
        }

        let milestone = match &issue.milestone {
            Some(spec) => {
                let number = self.ensure_milestone(spec)?;
                if number.is_none() {
                    warnings.push(format!("milestone {} unavailable, left off", spec.title));
                }
                number
            }
            None => None,
        };

        let request = IssueRequest {
            title: issue.title.clone(),
            body: issue.body.clone(),
            assignee: issue.assignee.clone(),
            labels,
            milestone,
        };

        let target = self.target;
        let created = with_retry(&self.retry, "create_issue", || target.create_issue(&request))?;
        info!(
            issue = %issue.source_key,
            number = created.number,
            "Created GitHub issue #{}",
            created.number
        );

        let mut outcome = WriteOutcome {
            source_key: issue.source_key.clone(),
            number: created.number,
            url: created.url.clone(),
            warnings,
        };

        if issue.closed {
            let result = with_retry(&self.retry, "close_issue", || {
                target.close_issue(created.number)
            });
            record_warning(&mut outcome, "close issue", result)?;
        }

        for (index, comment) in issue.comments.iter().enumerate() {
            let result = with_retry(&self.retry, "add_comment", || {
                target.add_comment(created.number, comment)
            });
            record_warning(&mut outcome, &format!("add comment {}", index + 1), result)?;
        }

        if self.place_on_boards {
            if let Some(placement) = &issue.board {
                let result = self.place_on_board(placement, created.id);
                record_warning(&mut outcome, "place on project board", result)?;
            }
        }

        Ok(outcome)
    }

    /// Existing label name for `name`, creating the label if needed.
    ///
    /// `None` when creation failed for a non-fatal reason, now or earlier
    /// in the run.
    fn ensure_label(&mut self, name: &str) -> Result<Option<String>> {
        let target = self.target;

        if !self.labels.loaded {
            let existing = with_retry(&self.retry, "list_labels", || target.list_labels())?;
            for label in existing {
                self.labels.insert(label.name);
            }
            self.labels.loaded = true;
            debug!(count = self.labels.len(), "Loaded existing labels");
        }

        if let Some(existing) = self.labels.get(name) {
            return Ok(Some(existing.to_string()));
        }
        if self.labels.is_unavailable(name) {
            return Ok(None);
        }

        let created = match with_retry(&self.retry, "create_label", || target.create_label(name)) {
            Ok(label) => {
                info!(label = %label.name, "Created label");
                label.name
            }
            // Another writer created it since the listing; reuse it
            Err(MigrateError::Validation(message)) => {
                warn!(label = name, "Label creation rejected, assuming it exists: {}", message);
                name.to_string()
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(label = name, "Label unavailable, leaving it off: {}", e);
                self.labels.unavailable.insert(name.to_lowercase());
                return Ok(None);
            }
        };
        self.labels.insert(created.clone());
        Ok(Some(created))
    }

    /// Milestone number for a sprint, creating the milestone if needed.
    ///
    /// `None` when creation failed for a non-fatal reason; the sprint is not
    /// tried again during the run.
    fn ensure_milestone(&mut self, spec: &MilestoneSpec) -> Result<Option<u64>> {
        let target = self.target;

        if !self.milestones.loaded {
            let existing =
                with_retry(&self.retry, "list_milestones", || target.list_milestones())?;
            for milestone in existing {
                self.milestones
                    .entries
                    .insert(milestone.title, MilestoneEntry::Available(milestone.number));
            }
            self.milestones.loaded = true;
            debug!(count = self.milestones.len(), "Loaded existing milestones");
        }

        match self.milestones.entries.get(&spec.title) {
            Some(MilestoneEntry::Available(number)) => return Ok(Some(*number)),
            Some(MilestoneEntry::Unavailable) => return Ok(None),
            None => {}
        }

        let (entry, number) = match with_retry(&self.retry, "create_milestone", || {
            target.create_milestone(spec)
        }) {
            Ok(created) => {
                info!(milestone = %created.title, number = created.number, "Created milestone");
                (MilestoneEntry::Available(created.number), Some(created.number))
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(
                    milestone = %spec.title,
                    "Milestone unavailable, issues in this sprint go without one: {}", e
                );
                (MilestoneEntry::Unavailable, None)
            }
        };
        self.milestones.entries.insert(spec.title.clone(), entry);
        Ok(number)
    }

    fn place_on_board(&mut self, placement: &BoardPlacement, issue_id: u64) -> Result<()> {
        let target = self.target;
        let retry = self.retry.clone();

        if !self.boards.loaded {
            let existing = with_retry(&retry, "list_projects", || target.list_projects())?;
            for project in existing {
                self.boards.projects.insert(
                    project.name,
                    ProjectEntry::Available {
                        id: project.id,
                        columns: None,
                    },
                );
            }
            self.boards.loaded = true;
        }

        if !self.boards.projects.contains_key(&placement.project) {
            let body = format!("Migrated from Jira project {}.", placement.project);
            let entry = match with_retry(&retry, "create_project", || {
                target.create_project(&placement.project, &body)
            }) {
                Ok(project) => {
                    info!(project = %project.name, "Created project board");
                    ProjectEntry::Available {
                        id: project.id,
                        columns: Some(HashMap::new()),
                    }
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        project = %placement.project,
                        "Project board unavailable, skipping placement for this project: {}", e
                    );
                    ProjectEntry::Unavailable
                }
            };
            self.boards.projects.insert(placement.project.clone(), entry);
        }

        let (project_id, columns) = match self.boards.projects.get_mut(&placement.project) {
            Some(ProjectEntry::Available { id, columns }) => (*id, columns),
            Some(ProjectEntry::Unavailable) | None => {
                return Err(MigrateError::NotFound(format!(
                    "project board {}",
                    placement.project
                )));
            }
        };

        if columns.is_none() {
            let existing =
                with_retry(&retry, "list_columns", || target.list_columns(project_id))?;
            *columns = Some(existing.into_iter().map(|c| (c.name, c.id)).collect());
        }
        let columns = columns.get_or_insert_with(HashMap::new);

        let column_id = match columns.get(&placement.column).copied() {
            Some(id) => id,
            None => {
                let column = with_retry(&retry, "create_column", || {
                    target.create_column(project_id, &placement.column)
                })?;
                info!(project = %placement.project, column = %column.name, "Created project column");
                columns.insert(placement.column.clone(), column.id);
                column.id
            }
        };

        with_retry(&retry, "add_card", || target.add_card(column_id, issue_id))
    }
}

/// Turn a post-creation failure into a warning; fatal errors still propagate
fn record_warning(outcome: &mut WriteOutcome, step: &str, result: Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!(issue = %outcome.source_key, number = outcome.number, "Failed to {}: {}", step, e);
            outcome.warnings.push(format!("{}: {}", step, e));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory repository that records every call
    #[derive(Default)]
    struct FakeRepo {
        calls: RefCell<Vec<String>>,
        milestones: RefCell<Vec<RemoteMilestone>>,
        labels: RefCell<Vec<RemoteLabel>>,
        projects: RefCell<Vec<RemoteProject>>,
        columns: RefCell<Vec<(u64, RemoteColumn)>>,
        issues: RefCell<Vec<IssueRequest>>,
        /// Errors returned by upcoming create_issue calls, in order
        create_failures: RefCell<Vec<MigrateError>>,
        projects_disabled: bool,
        /// Error returned by every create_milestone call
        milestone_failure: Option<fn() -> MigrateError>,
        /// create_label fails with a server error for these names
        broken_labels: Vec<String>,
    }

    impl FakeRepo {
        fn count(&self, call: &str) -> usize {
            self.calls.borrow().iter().filter(|c| *c == call).count()
        }

        fn record(&self, call: &str) {
            self.calls.borrow_mut().push(call.to_string());
        }
    }

    impl IssueTarget for FakeRepo {
        fn list_milestones(&self) -> Result<Vec<RemoteMilestone>> {
            self.record("list_milestones");
            Ok(self.milestones.borrow().clone())
        }

        fn create_milestone(&self, milestone: &MilestoneSpec) -> Result<RemoteMilestone> {
            self.record("create_milestone");
            if let Some(failure) = self.milestone_failure {
                return Err(failure());
            }
            let mut milestones = self.milestones.borrow_mut();
            let created = RemoteMilestone {
                number: milestones.len() as u64 + 1,
                title: milestone.title.clone(),
            };
            milestones.push(created.clone());
            Ok(created)
        }

        fn list_labels(&self) -> Result<Vec<RemoteLabel>> {
            self.record("list_labels");
            Ok(self.labels.borrow().clone())
        }

        fn create_label(&self, name: &str) -> Result<RemoteLabel> {
            self.record("create_label");
            if self.broken_labels.iter().any(|l| l == name) {
                return Err(MigrateError::Api {
                    status: 500,
                    message: "Server Error".into(),
                });
            }
            let label = RemoteLabel {
                name: name.to_string(),
            };
            self.labels.borrow_mut().push(label.clone());
            Ok(label)
        }

        fn list_projects(&self) -> Result<Vec<RemoteProject>> {
            self.record("list_projects");
            Ok(self.projects.borrow().clone())
        }

        fn create_project(&self, name: &str, _body: &str) -> Result<RemoteProject> {
            self.record("create_project");
            if self.projects_disabled {
                return Err(MigrateError::Api {
                    status: 410,
                    message: "Projects are disabled".into(),
                });
            }
            let project = RemoteProject {
                id: 500 + self.projects.borrow().len() as u64,
                name: name.to_string(),
            };
            self.projects.borrow_mut().push(project.clone());
            Ok(project)
        }

        fn list_columns(&self, project_id: u64) -> Result<Vec<RemoteColumn>> {
            self.record("list_columns");
            Ok(self
                .columns
                .borrow()
                .iter()
                .filter(|(p, _)| *p == project_id)
                .map(|(_, c)| c.clone())
                .collect())
        }

        fn create_column(&self, project_id: u64, name: &str) -> Result<RemoteColumn> {
            self.record("create_column");
            let column = RemoteColumn {
                id: 900 + self.columns.borrow().len() as u64,
                name: name.to_string(),
            };
            self.columns.borrow_mut().push((project_id, column.clone()));
            Ok(column)
        }

        fn add_card(&self, _column_id: u64, _issue_id: u64) -> Result<()> {
            self.record("add_card");
            Ok(())
        }

        fn create_issue(&self, issue: &IssueRequest) -> Result<CreatedIssue> {
            self.record("create_issue");
            if let Some(err) = self.create_failures.borrow_mut().pop() {
                return Err(err);
            }
            let mut issues = self.issues.borrow_mut();
            issues.push(issue.clone());
            let number = issues.len() as u64;
            Ok(CreatedIssue {
                id: 10_000 + number,
                number,
                url: None,
            })
        }

        fn close_issue(&self, _number: u64) -> Result<()> {
            self.record("close_issue");
            Ok(())
        }

        fn add_comment(&self, _number: u64, _body: &str) -> Result<()> {
            self.record("add_comment");
            Ok(())
        }
    }

    fn target(key: &str) -> TargetIssue {
        TargetIssue {
            source_key: key.to_string(),
            title: format!("Issue {}", key),
            body: "Migrated".to_string(),
            assignee: None,
            labels: Vec::new(),
            milestone: None,
            board: None,
            closed: false,
            comments: Vec::new(),
        }
    }

    fn milestone(title: &str) -> MilestoneSpec {
        MilestoneSpec {
            title: title.to_string(),
            description: None,
            due_on: None,
            closed: false,
        }
    }

    #[test]
    fn shared_sprint_creates_one_milestone() {
        let repo = FakeRepo::default();
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(0));

        let mut first = target("PROJ-1");
        first.milestone = Some(milestone("Sprint 4"));
        let mut second = target("PROJ-2");
        second.milestone = Some(milestone("Sprint 4"));

        writer.write(&first).unwrap();
        writer.write(&second).unwrap();

        assert_eq!(repo.count("create_milestone"), 1);
        assert_eq!(repo.count("list_milestones"), 1);
        let issues = repo.issues.borrow();
        assert_eq!(issues[0].milestone, Some(1));
        assert_eq!(issues[1].milestone, Some(1));
    }

    #[test]
    fn existing_milestone_is_reused() {
        let repo = FakeRepo::default();
        repo.milestones.borrow_mut().push(RemoteMilestone {
            number: 12,
            title: "Sprint 9".into(),
        });
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(0));

        let mut issue = target("PROJ-1");
        issue.milestone = Some(milestone("Sprint 9"));
        writer.write(&issue).unwrap();

        assert_eq!(repo.count("create_milestone"), 0);
        assert_eq!(repo.issues.borrow()[0].milestone, Some(12));
    }

    #[test]
    fn labels_are_created_once_and_matched_case_insensitively() {
        let repo = FakeRepo::default();
        repo.labels.borrow_mut().push(RemoteLabel { name: "Bug".into() });
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(0));

        let mut first = target("PROJ-1");
        first.labels = vec!["bug".into(), "backend".into()];
        let mut second = target("PROJ-2");
        second.labels = vec!["backend".into()];

        writer.write(&first).unwrap();
        writer.write(&second).unwrap();

        assert_eq!(repo.count("list_labels"), 1);
        assert_eq!(repo.count("create_label"), 1);
        assert_eq!(repo.issues.borrow()[0].labels, vec!["Bug", "backend"]);
        assert_eq!(writer.labels().len(), 2);
    }

    #[test]
    fn rate_limited_create_is_retried_without_duplicates() {
        let repo = FakeRepo::default();
        repo.create_failures
            .borrow_mut()
            .push(MigrateError::RateLimited {
                service: "github".into(),
                retry_after: None,
            });
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(2));

        let outcome = writer.write(&target("PROJ-1")).unwrap();

        assert_eq!(outcome.number, 1);
        assert_eq!(repo.count("create_issue"), 2);
        assert_eq!(repo.issues.borrow().len(), 1);
    }

    #[test]
    fn overlong_title_fails_validation_without_api_calls() {
        let repo = FakeRepo::default();
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(0));

        let mut issue = target("PROJ-1");
        issue.title = "x".repeat(MAX_TITLE_CHARS + 1);
        let err = writer.write(&issue).unwrap_err();

        assert!(matches!(err, MigrateError::Validation(_)));
        assert!(repo.calls.borrow().is_empty());
    }

    #[test]
    fn closed_issue_with_comments_and_board() {
        let repo = FakeRepo::default();
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(0));

        let mut issue = target("PROJ-1");
        issue.closed = true;
        issue.comments = vec!["one".into(), "two".into()];
        issue.board = Some(BoardPlacement {
            project: "Platform".into(),
            column: "Done".into(),
        });
        let mut second = target("PROJ-2");
        second.board = issue.board.clone();

        let outcome = writer.write(&issue).unwrap();
        writer.write(&second).unwrap();

        assert!(outcome.warnings.is_empty());
        assert_eq!(repo.count("close_issue"), 1);
        assert_eq!(repo.count("add_comment"), 2);
        assert_eq!(repo.count("create_project"), 1);
        assert_eq!(repo.count("create_column"), 1);
        assert_eq!(repo.count("add_card"), 2);
    }

    #[test]
    fn unavailable_project_becomes_warning_and_is_not_retried() {
        let repo = FakeRepo {
            projects_disabled: true,
            ..Default::default()
        };
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(0));

        let mut first = target("PROJ-1");
        first.board = Some(BoardPlacement {
            project: "Platform".into(),
            column: "To Do".into(),
        });
        let mut second = target("PROJ-2");
        second.board = first.board.clone();

        let outcome = writer.write(&first).unwrap();
        let second_outcome = writer.write(&second).unwrap();

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(second_outcome.warnings.len(), 1);
        assert_eq!(repo.count("create_project"), 1);
        assert_eq!(repo.issues.borrow().len(), 2);
    }

    #[test]
    fn rejected_milestone_is_tried_once_and_issues_still_created() {
        let repo = FakeRepo {
            milestone_failure: Some(|| MigrateError::Validation("due_on is invalid".into())),
            ..Default::default()
        };
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(0));

        let mut first = target("PROJ-1");
        first.milestone = Some(milestone("Sprint 4"));
        let mut second = target("PROJ-2");
        second.milestone = Some(milestone("Sprint 4"));

        let first_outcome = writer.write(&first).unwrap();
        let second_outcome = writer.write(&second).unwrap();

        assert_eq!(repo.count("create_milestone"), 1);
        assert_eq!(repo.count("create_issue"), 2);
        assert_eq!(first_outcome.warnings.len(), 1);
        assert_eq!(second_outcome.warnings.len(), 1);
        assert!(first_outcome.warnings[0].contains("Sprint 4"));
        assert!(writer.milestones().is_unavailable("Sprint 4"));
        let issues = repo.issues.borrow();
        assert_eq!(issues[0].milestone, None);
        assert_eq!(issues[1].milestone, None);
    }

    #[test]
    fn broken_label_is_left_off_and_not_retried() {
        let repo = FakeRepo {
            broken_labels: vec!["needs triage".into()],
            ..Default::default()
        };
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(0));

        let mut first = target("PROJ-1");
        first.labels = vec!["Bug".into(), "needs triage".into()];
        let mut second = target("PROJ-2");
        second.labels = vec!["Needs Triage".into()];

        let first_outcome = writer.write(&first).unwrap();
        let second_outcome = writer.write(&second).unwrap();

        assert_eq!(repo.count("create_label"), 2);
        assert_eq!(first_outcome.warnings.len(), 1);
        assert_eq!(second_outcome.warnings.len(), 1);
        let issues = repo.issues.borrow();
        assert_eq!(issues[0].labels, vec!["Bug"]);
        assert!(issues[1].labels.is_empty());
    }

    #[test]
    fn fatal_milestone_error_propagates() {
        let repo = FakeRepo {
            milestone_failure: Some(|| MigrateError::Unauthorized("github".into())),
            ..Default::default()
        };
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(0));

        let mut issue = target("PROJ-1");
        issue.milestone = Some(milestone("Sprint 4"));
        let err = writer.write(&issue).unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(repo.count("create_issue"), 0);
    }

    #[test]
    fn boards_can_be_disabled() {
        let repo = FakeRepo::default();
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(0)).with_boards(false);

        let mut issue = target("PROJ-1");
        issue.board = Some(BoardPlacement {
            project: "Platform".into(),
            column: "To Do".into(),
        });
        writer.write(&issue).unwrap();

        assert_eq!(repo.count("list_projects"), 0);
        assert_eq!(repo.count("add_card"), 0);
    }

    #[test]
    fn auth_failure_propagates() {
        let repo = FakeRepo::default();
        repo.create_failures
            .borrow_mut()
            .push(MigrateError::Unauthorized("github".into()));
        let mut writer = GitHubWriter::new(&repo, RetryConfig::immediate(3));

        let err = writer.write(&target("PROJ-1")).unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(repo.count("create_issue"), 1);
    }
}
