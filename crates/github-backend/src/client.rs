use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;

use crate::error::{GitHubError, Result};
use crate::models::*;

/// Media type for the classic projects API
const PROJECTS_ACCEPT: &str = "application/vnd.github.inertia-preview+json";
const DEFAULT_ACCEPT: &str = "application/vnd.github+json";

/// GitHub REST API client scoped to one repository
pub struct GitHubClient {
    agent: Agent,
    base_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    /// Create a new GitHub client targeting api.github.com
    pub fn new(owner: &str, repo: &str, token: &str) -> Self {
        Self::with_base_url("https://api.github.com", owner, repo, token)
    }

    /// Create a new GitHub client with a custom base URL (for GitHub Enterprise or testing)
    pub fn with_base_url(base_url: &str, owner: &str, repo: &str, token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
        }
    }

    /// Get the owner for this client
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repo for this client
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Build a repo-scoped URL
    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.base_url, self.owner, self.repo, path
        )
    }

    /// Build the Authorization header value
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Check response status and return error if not successful
    fn check_response(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<ureq::http::Response<ureq::Body>> {
        let status = response.status().as_u16();

        if (200..300).contains(&status) {
            return Ok(response);
        }

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
        };
        let retry_after = header("retry-after")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .or_else(|| {
                header("x-ratelimit-reset")
                    .and_then(|v| v.parse::<i64>().ok())
                    .map(|reset| {
                        let wait = reset - chrono::Utc::now().timestamp();
                        Duration::from_secs(wait.max(0) as u64)
                    })
            });
        let remaining = header("x-ratelimit-remaining");

        if status == 429 {
            return Err(GitHubError::RateLimited { retry_after });
        }

        // Primary limit: 403 with x-ratelimit-remaining: 0
        if status == 403 && remaining.as_deref() == Some("0") {
            return Err(GitHubError::RateLimited { retry_after });
        }

        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());
        let message = error_message(&body, status);

        match status {
            401 => Err(GitHubError::Unauthorized),
            // Secondary limits come back as 403 with an explanatory message
            403 if message.to_lowercase().contains("rate limit") => {
                Err(GitHubError::RateLimited { retry_after })
            }
            404 => Err(GitHubError::NotFound(message)),
            422 => Err(GitHubError::Validation(message)),
            _ => Err(GitHubError::Api { status, message }),
        }
    }

    /// Read a JSON body, keeping parse failures distinct from transport errors
    fn read_json<T: DeserializeOwned>(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<T> {
        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T> {
        debug!(url, "GET");
        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.auth_header())
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", "2022-11-28")
            .call()
            .map_err(GitHubError::Http)?;

        let response = self.check_response(response)?;
        self.read_json(response)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        accept: &str,
        body: &B,
    ) -> Result<T> {
        debug!(url, "POST");
        let response = self
            .agent
            .post(url)
            .header("Authorization", &self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send_json(body)
            .map_err(GitHubError::Http)?;

        let response = self.check_response(response)?;
        self.read_json(response)
    }

    // ==================== Repository Operations ====================

    /// Get the target repository; fails when the token cannot see it
    pub fn get_repo(&self) -> Result<GitHubRepo> {
        self.get_json(&self.repo_url(""), DEFAULT_ACCEPT)
    }

    // ==================== Issue Operations ====================

    /// Create a new issue
    pub fn create_issue(&self, issue: &CreateGitHubIssue) -> Result<GitHubIssue> {
        self.post_json(&self.repo_url("/issues"), DEFAULT_ACCEPT, issue)
    }

    /// Update an existing issue
    pub fn update_issue(&self, number: u64, update: &UpdateGitHubIssue) -> Result<GitHubIssue> {
        let url = self.repo_url(&format!("/issues/{}", number));
        debug!(url, "PATCH");

        let response = self
            .agent
            .patch(&url)
            .header("Authorization", &self.auth_header())
            .header("Content-Type", "application/json")
            .header("Accept", DEFAULT_ACCEPT)
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send_json(update)
            .map_err(GitHubError::Http)?;

        let response = self.check_response(response)?;
        self.read_json(response)
    }

    // ==================== Comment Operations ====================

    /// Add a comment to an issue
    pub fn add_comment(&self, number: u64, body: &str) -> Result<GitHubComment> {
        let comment = CreateGitHubComment {
            body: body.to_string(),
        };
        self.post_json(
            &self.repo_url(&format!("/issues/{}/comments", number)),
            DEFAULT_ACCEPT,
            &comment,
        )
    }

    // ==================== Milestone Operations ====================

    /// List one page of milestones, open and closed
    pub fn list_milestones(&self, per_page: usize, page: usize) -> Result<Vec<GitHubMilestone>> {
        let url = format!(
            "{}?state=all&per_page={}&page={}",
            self.repo_url("/milestones"),
            per_page,
            page
        );
        self.get_json(&url, DEFAULT_ACCEPT)
    }

    pub fn create_milestone(&self, milestone: &CreateGitHubMilestone) -> Result<GitHubMilestone> {
        self.post_json(&self.repo_url("/milestones"), DEFAULT_ACCEPT, milestone)
    }

    // ==================== Label Operations ====================

    /// List one page of labels
    pub fn list_labels(&self, per_page: usize, page: usize) -> Result<Vec<GitHubLabel>> {
        let url = format!(
            "{}?per_page={}&page={}",
            self.repo_url("/labels"),
            per_page,
            page
        );
        self.get_json(&url, DEFAULT_ACCEPT)
    }

    /// Create a label
    pub fn create_label(&self, label: &CreateGitHubLabel) -> Result<GitHubLabel> {
        self.post_json(&self.repo_url("/labels"), DEFAULT_ACCEPT, label)
    }

    // ==================== Project Board Operations ====================

    /// List one page of repository project boards
    pub fn list_projects(&self, per_page: usize, page: usize) -> Result<Vec<GitHubProject>> {
        let url = format!(
            "{}?state=all&per_page={}&page={}",
            self.repo_url("/projects"),
            per_page,
            page
        );
        self.get_json(&url, PROJECTS_ACCEPT)
    }

    pub fn create_project(&self, project: &CreateGitHubProject) -> Result<GitHubProject> {
        self.post_json(&self.repo_url("/projects"), PROJECTS_ACCEPT, project)
    }

    pub fn list_columns(
        &self,
        project_id: u64,
        per_page: usize,
        page: usize,
    ) -> Result<Vec<GitHubColumn>> {
        let url = format!(
            "{}/projects/{}/columns?per_page={}&page={}",
            self.base_url, project_id, per_page, page
        );
        self.get_json(&url, PROJECTS_ACCEPT)
    }

    pub fn create_column(&self, project_id: u64, name: &str) -> Result<GitHubColumn> {
        let url = format!("{}/projects/{}/columns", self.base_url, project_id);
        let column = CreateGitHubColumn {
            name: name.to_string(),
        };
        self.post_json(&url, PROJECTS_ACCEPT, &column)
    }

    pub fn create_card(&self, column_id: u64, card: &CreateGitHubCard) -> Result<GitHubCard> {
        let url = format!("{}/projects/columns/{}/cards", self.base_url, column_id);
        self.post_json(&url, PROJECTS_ACCEPT, card)
    }
}

/// Pull `message` (and any validation `errors`) out of a GitHub error body
fn error_message(body: &str, status: u16) -> String {
    let Ok(error_response) = serde_json::from_str::<serde_json::Value>(body) else {
        return if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body.to_string()
        };
    };

    let mut message = error_response
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or(body)
        .to_string();

    let details: Vec<String> = error_response
        .get("errors")
        .and_then(|e| e.as_array())
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| {
                    let field = e.get("field").and_then(|f| f.as_str());
                    let code = e.get("code").and_then(|c| c.as_str());
                    let text = e.get("message").and_then(|m| m.as_str());
                    match (field, code, text) {
                        (_, _, Some(text)) => Some(text.to_string()),
                        (Some(field), Some(code), None) => Some(format!("{} {}", field, code)),
                        _ => None,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    if !details.is_empty() {
        message = format!("{} ({})", message, details.join("; "));
    }
    message
}

/// Stable label color derived from the label name (FNV-1a)
pub fn label_color(name: &str) -> String {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in name.to_lowercase().bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    format!("{:06x}", hash & 0x00ff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_color_is_stable_hex() {
        let color = label_color("Bug");
        assert_eq!(color.len(), 6);
        assert!(color.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(color, label_color("bug"));
        assert_ne!(color, label_color("Story"));
    }

    #[test]
    fn error_message_includes_validation_details() {
        let body = r#"{"message":"Validation Failed","errors":[{"resource":"Label","field":"name","code":"already_exists"}]}"#;
        assert_eq!(
            error_message(body, 422),
            "Validation Failed (name already_exists)"
        );
        assert_eq!(error_message("", 502), "HTTP 502");
    }
}
