//! Implementation of the migrate-core target trait for GitHubClient

use migrate_core::{
    CreatedIssue, IssueRequest, IssueTarget, MigrateError, MilestoneSpec, RemoteColumn,
    RemoteLabel, RemoteMilestone, RemoteProject, Result, fetch_all_pages,
};

use crate::client::{GitHubClient, label_color};
use crate::models::*;

/// GitHub's maximum page size
const PER_PAGE: usize = 100;

fn create_request(issue: &IssueRequest) -> CreateGitHubIssue {
    CreateGitHubIssue {
        title: issue.title.clone(),
        body: Some(issue.body.clone()),
        labels: if issue.labels.is_empty() {
            None
        } else {
            Some(issue.labels.clone())
        },
        assignees: issue.assignee.as_ref().map(|login| vec![login.clone()]),
        milestone: issue.milestone,
    }
}

fn milestone_request(spec: &MilestoneSpec) -> CreateGitHubMilestone {
    CreateGitHubMilestone {
        title: spec.title.clone(),
        state: if spec.closed { "closed" } else { "open" }.to_string(),
        description: spec.description.clone(),
        due_on: spec
            .due_on
            .map(|d| d.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
    }
}

impl IssueTarget for GitHubClient {
    fn list_milestones(&self) -> Result<Vec<RemoteMilestone>> {
        let milestones = fetch_all_pages(
            |page, per_page| {
                self.list_milestones(per_page, page)
                    .map_err(MigrateError::from)
            },
            PER_PAGE,
        )?;
        Ok(milestones
            .into_iter()
            .map(|m| RemoteMilestone {
                number: m.number,
                title: m.title,
            })
            .collect())
    }

    fn create_milestone(&self, milestone: &MilestoneSpec) -> Result<RemoteMilestone> {
        let created = self
            .create_milestone(&milestone_request(milestone))
            .map_err(MigrateError::from)?;
        Ok(RemoteMilestone {
            number: created.number,
            title: created.title,
        })
    }

    fn list_labels(&self) -> Result<Vec<RemoteLabel>> {
        let labels = fetch_all_pages(
            |page, per_page| self.list_labels(per_page, page).map_err(MigrateError::from),
            PER_PAGE,
        )?;
        Ok(labels
            .into_iter()
            .map(|l| RemoteLabel { name: l.name })
            .collect())
    }

    fn create_label(&self, name: &str) -> Result<RemoteLabel> {
        let label = CreateGitHubLabel {
            name: name.to_string(),
            color: label_color(name),
            description: Some("Migrated from Jira".to_string()),
        };
        let created = self.create_label(&label).map_err(MigrateError::from)?;
        Ok(RemoteLabel { name: created.name })
    }

    fn list_projects(&self) -> Result<Vec<RemoteProject>> {
        let projects = fetch_all_pages(
            |page, per_page| {
                self.list_projects(per_page, page)
                    .map_err(MigrateError::from)
            },
            PER_PAGE,
        )?;
        Ok(projects
            .into_iter()
            .map(|p| RemoteProject {
                id: p.id,
                name: p.name,
            })
            .collect())
    }

    fn create_project(&self, name: &str, body: &str) -> Result<RemoteProject> {
        let project = CreateGitHubProject {
            name: name.to_string(),
            body: Some(body.to_string()).filter(|b| !b.is_empty()),
        };
        let created = self.create_project(&project).map_err(MigrateError::from)?;
        Ok(RemoteProject {
            id: created.id,
            name: created.name,
        })
    }

    fn list_columns(&self, project_id: u64) -> Result<Vec<RemoteColumn>> {
        let columns = fetch_all_pages(
            |page, per_page| {
                self.list_columns(project_id, per_page, page)
                    .map_err(MigrateError::from)
            },
            PER_PAGE,
        )?;
        Ok(columns
            .into_iter()
            .map(|c| RemoteColumn {
                id: c.id,
                name: c.name,
            })
            .collect())
    }

    fn create_column(&self, project_id: u64, name: &str) -> Result<RemoteColumn> {
        let created = self
            .create_column(project_id, name)
            .map_err(MigrateError::from)?;
        Ok(RemoteColumn {
            id: created.id,
            name: created.name,
        })
    }

    fn add_card(&self, column_id: u64, issue_id: u64) -> Result<()> {
        self.create_card(column_id, &CreateGitHubCard::for_issue(issue_id))
            .map_err(MigrateError::from)?;
        Ok(())
    }

    fn create_issue(&self, issue: &IssueRequest) -> Result<CreatedIssue> {
        let created = self
            .create_issue(&create_request(issue))
            .map_err(MigrateError::from)?;
        Ok(CreatedIssue {
            id: created.id,
            number: created.number,
            url: created.html_url,
        })
    }

    fn close_issue(&self, number: u64) -> Result<()> {
        self.update_issue(number, &UpdateGitHubIssue::close_completed())
            .map_err(MigrateError::from)?;
        Ok(())
    }

    fn add_comment(&self, number: u64, body: &str) -> Result<()> {
        self.add_comment(number, body).map_err(MigrateError::from)?;
        Ok(())
    }
}
