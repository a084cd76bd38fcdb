//! One migration run: read, map, write, summarize

use anyhow::{anyhow, Context, Result};
use github_backend::GitHubClient;
use jira_backend::{JiraClient, JiraIssueReader, ReaderOptions};
use migrate_core::{
    map_issue, GitHubWriter, IssueSource, MigrateError, TargetIssue, UsernameMap, WriteOutcome,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::Config;

/// An issue that could not be read or created
#[derive(Debug, Clone, Serialize)]
pub struct FailedIssue {
    /// Jira key, or a description of the failed step when no key is known
    pub key: String,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub migrated: Vec<WriteOutcome>,
    /// Issues that would have been created (dry run only)
    pub planned: Vec<TargetIssue>,
    pub failed: Vec<FailedIssue>,
    /// Set when a fatal error stopped the run early
    pub aborted: Option<String>,
}

impl RunSummary {
    /// 0 everything migrated, 1 aborted, 2 finished with failed issues
    pub fn exit_code(&self) -> u8 {
        if self.aborted.is_some() {
            1
        } else if !self.failed.is_empty() {
            2
        } else {
            0
        }
    }

    pub fn warning_count(&self) -> usize {
        self.migrated.iter().map(|o| o.warnings.len()).sum()
    }

    fn fail(&mut self, key: &str, err: &MigrateError) {
        self.failed.push(FailedIssue {
            key: key.to_string(),
            error: err.to_string(),
        });
    }
}

/// Connect to both services and migrate every issue the search selects.
///
/// Errors returned here happen before any issue is touched; failures during
/// the run are reported in the summary instead.
pub fn run(config: &Config, dry_run: bool) -> Result<RunSummary> {
    let users = config.username_map()?;
    info!(mapped_users = users.len(), "Loaded username mapping");

    let jira = JiraClient::new(
        setting(&config.jira_server)?,
        setting(&config.jira_username)?,
        setting(&config.jira_token)?,
    );
    let me = jira
        .myself()
        .map_err(MigrateError::from)
        .with_context(|| format!("Cannot access Jira at {}", jira.base_url()))?;
    info!(
        user = me.display_name.as_deref().unwrap_or("unknown"),
        "Connected to Jira"
    );

    let reader = JiraIssueReader::new(
        jira,
        ReaderOptions {
            page_size: config.page_size,
            sprint_field: config.sprint_field.clone(),
            retry: config.retry.clone(),
        },
    );
    let query = config.jira_search.as_deref().unwrap_or_default();

    if dry_run {
        info!("Dry run: nothing will be written to GitHub");
        return Ok(migrate_issues(&reader, query, &users, None));
    }

    let repo_slug = setting(&config.github_repo)?;
    let (owner, repo) = github_backend::parse_repo_slug(repo_slug)
        .ok_or_else(|| anyhow!("Invalid --github_repo '{}'", repo_slug))?;
    let github = GitHubClient::with_base_url(
        &config.github_api_url,
        owner,
        repo,
        setting(&config.github_token)?,
    );
    let repository = github
        .get_repo()
        .map_err(MigrateError::from)
        .with_context(|| format!("Cannot access GitHub repository {}", repo_slug))?;
    if !repository.has_issues {
        return Err(anyhow!(
            "Issues are disabled on {}",
            repository.full_name
        ));
    }
    info!(repo = %repository.full_name, "Connected to GitHub");

    let place_on_boards = !config.skip_projects && repository.has_projects;
    if !config.skip_projects && !repository.has_projects {
        warn!(repo = %repository.full_name, "Projects are disabled, skipping board placement");
    }

    let mut writer =
        GitHubWriter::new(&github, config.retry.clone()).with_boards(place_on_boards);
    let summary = migrate_issues(&reader, query, &users, Some(&mut writer));
    info!(
        milestones = writer.milestones().len(),
        labels = writer.labels().len(),
        "Known GitHub milestones and labels"
    );
    Ok(summary)
}

fn setting(value: &Option<String>) -> Result<&str> {
    value
        .as_deref()
        .ok_or_else(|| anyhow!("setting missing after validation"))
}

/// Stream issues from `source` through the mapper into `writer`.
///
/// Without a writer the mapped issues are only collected (dry run). Fatal
/// errors stop the loop and are recorded in `aborted`.
pub fn migrate_issues(
    source: &dyn IssueSource,
    query: &str,
    users: &UsernameMap,
    mut writer: Option<&mut GitHubWriter<'_>>,
) -> RunSummary {
    let mut summary = RunSummary {
        dry_run: writer.is_none(),
        ..Default::default()
    };

    for item in source.issues(query) {
        let issue = match item {
            Ok(issue) => issue,
            Err(e) if e.is_fatal() => {
                error!("Reading Jira failed, aborting: {}", e);
                summary.aborted = Some(e.to_string());
                break;
            }
            Err(e) => {
                warn!("Skipping unreadable Jira issue: {}", e);
                summary.fail(e.issue_key().unwrap_or("jira"), &e);
                continue;
            }
        };

        let target = map_issue(&issue, users);
        if let Some(assignee) = issue.assignee.as_ref().filter(|_| target.assignee.is_none()) {
            warn!(
                issue = %issue.key,
                jira_user = %assignee.id,
                "No GitHub login mapped for assignee, creating unassigned"
            );
        }

        let Some(writer) = writer.as_deref_mut() else {
            info!(issue = %issue.key, title = %target.title, "Would create issue");
            summary.planned.push(target);
            continue;
        };

        match writer.write(&target) {
            Ok(outcome) => summary.migrated.push(outcome),
            Err(e) if e.is_fatal() => {
                error!(issue = %issue.key, "Aborting migration: {}", e);
                summary.fail(&issue.key, &e);
                summary.aborted = Some(e.to_string());
                break;
            }
            Err(e) => {
                warn!(issue = %issue.key, "Failed to migrate issue: {}", e);
                summary.fail(&issue.key, &e);
            }
        }
    }

    info!(
        migrated = summary.migrated.len(),
        planned = summary.planned.len(),
        failed = summary.failed.len(),
        "Migration finished"
    );
    summary
}
