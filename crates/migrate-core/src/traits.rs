use crate::error::Result;
use crate::models::*;

/// Where issues are read from (Jira)
pub trait IssueSource {
    /// Lazily yield every issue matching `query`, oldest page first.
    ///
    /// An `Err` item describes one issue or page that could not be read;
    /// the sequence may continue after it.
    fn issues<'a>(&'a self, query: &str) -> Box<dyn Iterator<Item = Result<SourceIssue>> + 'a>;
}

/// Where issues are written to (a GitHub repository)
///
/// Every method is a single API call; caching and retries live in the writer.
pub trait IssueTarget {
    // ========== Milestones ==========

    /// All milestones of the repository, open and closed
    fn list_milestones(&self) -> Result<Vec<RemoteMilestone>>;

    fn create_milestone(&self, milestone: &MilestoneSpec) -> Result<RemoteMilestone>;

    // ========== Labels ==========

    fn list_labels(&self) -> Result<Vec<RemoteLabel>>;

    fn create_label(&self, name: &str) -> Result<RemoteLabel>;

    // ========== Project boards ==========

    fn list_projects(&self) -> Result<Vec<RemoteProject>>;

    fn create_project(&self, name: &str, body: &str) -> Result<RemoteProject>;

    fn list_columns(&self, project_id: u64) -> Result<Vec<RemoteColumn>>;

    fn create_column(&self, project_id: u64, name: &str) -> Result<RemoteColumn>;

    /// Put an issue (by global id) on a project column
    fn add_card(&self, column_id: u64, issue_id: u64) -> Result<()>;

    // ========== Issues ==========

    fn create_issue(&self, issue: &IssueRequest) -> Result<CreatedIssue>;

    fn close_issue(&self, number: u64) -> Result<()>;

    fn add_comment(&self, number: u64, body: &str) -> Result<()>;
}
