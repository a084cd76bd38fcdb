use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;

use crate::error::{JiraError, Result};
use crate::models::*;

/// Fields requested for every migrated issue, besides the sprint field
pub const DEFAULT_ISSUE_FIELDS: &[&str] = &[
    "summary",
    "description",
    "status",
    "issuetype",
    "project",
    "assignee",
    "reporter",
    "labels",
    "created",
    "updated",
    "comment",
];

/// Jira REST API client
pub struct JiraClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl JiraClient {
    /// Create a new Jira client with Basic Auth
    ///
    /// For Jira Cloud, use your email and an API token.
    /// For Jira Server, use your username and password.
    pub fn new(base_url: &str, email: &str, api_token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(30)))
            // Don't treat HTTP errors as errors - we'll handle them ourselves
            .http_status_as_error(false)
            .build()
            .into();

        // Base64 encode credentials for Basic Auth
        let credentials = format!("{}:{}", email, api_token);
        let encoded = base64_encode(&credentials);
        let auth_header = format!("Basic {}", encoded);

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/rest/api/3{}", self.base_url, path)
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

        if status == 401 {
            return Err(JiraError::Unauthorized);
        }

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(JiraError::RateLimited { retry_after });
        }

        // Try to read error body for better error messages
        let body = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|_| String::new());

        Err(JiraError::Api {
            status,
            message: error_message(&body, status),
        })
    }

    /// Read a JSON body, keeping parse failures distinct from transport errors
    fn read_json<T: DeserializeOwned>(
        &self,
        mut response: ureq::http::Response<ureq::Body>,
    ) -> Result<T> {
        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "GET");
        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        let response = self.check_response(response)?;
        self.read_json(response)
    }

    /// The authenticated user; used to verify credentials before a run
    pub fn myself(&self) -> Result<JiraUser> {
        self.get_json(&self.api_url("/myself"))
    }

    /// Fetch one page of issues matching `jql`
    pub fn search_page(
        &self,
        jql: &str,
        fields: &[String],
        max_results: usize,
        cursor: &PageCursor,
    ) -> Result<JiraSearchPage> {
        let mut url = format!(
            "{}?jql={}&maxResults={}&fields={}",
            self.api_url("/search/jql"),
            urlencoding::encode(jql),
            max_results,
            urlencoding::encode(&fields.join(","))
        );
        match cursor {
            PageCursor::Start => {}
            PageCursor::Offset(start_at) => url.push_str(&format!("&startAt={}", start_at)),
            PageCursor::Token(token) => {
                url.push_str(&format!("&nextPageToken={}", urlencoding::encode(token)))
            }
        }

        self.get_json(&url)
    }

    /// Get one page of comments on an issue, oldest first
    pub fn get_comments(
        &self,
        key: &str,
        start_at: usize,
        max_results: usize,
    ) -> Result<JiraCommentsResponse> {
        let url = format!(
            "{}?startAt={}&maxResults={}&orderBy=created",
            self.api_url(&format!("/issue/{}/comment", urlencoding::encode(key))),
            start_at,
            max_results
        );
        self.get_json(&url)
    }
}

/// Flatten a Jira error body ({"errorMessages":[..], "errors":{..}}) into one line
fn error_message(body: &str, status: u16) -> String {
    let Ok(error_response) = serde_json::from_str::<serde_json::Value>(body) else {
        return if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body.to_string()
        };
    };

    let mut messages = Vec::new();

    if let Some(errors) = error_response
        .get("errorMessages")
        .and_then(|e| e.as_array())
    {
        for e in errors {
            if let Some(s) = e.as_str() {
                messages.push(s.to_string());
            }
        }
    }

    if let Some(errors) = error_response.get("errors").and_then(|e| e.as_object()) {
        for (field, msg) in errors {
            if let Some(s) = msg.as_str() {
                messages.push(format!("{}: {}", field, s));
            }
        }
    }

    if messages.is_empty() {
        body.to_string()
    } else {
        messages.join("; ")
    }
}

/// Simple base64 encoding function
fn base64_encode(input: &str) -> String {
    const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let bytes = input.as_bytes();
    let mut result = String::new();

    for chunk in bytes.chunks(3) {
        let b0 = chunk[0] as usize;
        let b1 = chunk.get(1).copied().unwrap_or(0) as usize;
        let b2 = chunk.get(2).copied().unwrap_or(0) as usize;

        result.push(ALPHABET[b0 >> 2] as char);
        result.push(ALPHABET[((b0 & 0x03) << 4) | (b1 >> 4)] as char);

        if chunk.len() > 1 {
            result.push(ALPHABET[((b1 & 0x0f) << 2) | (b2 >> 6)] as char);
        } else {
            result.push('=');
        }

        if chunk.len() > 2 {
            result.push(ALPHABET[b2 & 0x3f] as char);
        } else {
            result.push('=');
        }
    }

    result
}
