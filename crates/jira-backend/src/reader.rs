//! Lazy, paginated issue reader

use std::collections::VecDeque;

use migrate_core::{IssueSource, MigrateError, RetryConfig, SourceIssue, with_retry};
use tracing::{debug, info, warn};

use crate::client::{DEFAULT_ISSUE_FIELDS, JiraClient};
use crate::convert::to_source_issue;
use crate::error::JiraError;
use crate::models::*;
use crate::sprint::DEFAULT_SPRINT_FIELD;

/// Query used when none is given: every issue, oldest first
pub const DEFAULT_JQL: &str = "created IS NOT EMPTY ORDER BY created ASC";

/// Default number of issues per search page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Comments fetched per request when an issue has more than Jira embeds
const COMMENT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub page_size: usize,
    /// Custom field id holding the sprint (e.g. "customfield_10020")
    pub sprint_field: String,
    pub retry: RetryConfig,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sprint_field: DEFAULT_SPRINT_FIELD.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

/// Reads issues from Jira one search page at a time
pub struct JiraIssueReader {
    client: JiraClient,
    options: ReaderOptions,
}

impl JiraIssueReader {
    pub fn new(client: JiraClient, options: ReaderOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &JiraClient {
        &self.client
    }

    /// Lazily iterate over every issue matching `jql`.
    ///
    /// A blank query falls back to [`DEFAULT_JQL`].
    pub fn search(&self, jql: &str) -> JiraIssues<'_> {
        let jql = if jql.trim().is_empty() {
            DEFAULT_JQL.to_string()
        } else {
            jql.trim().to_string()
        };

        let mut fields: Vec<String> = DEFAULT_ISSUE_FIELDS.iter().map(|f| f.to_string()).collect();
        if !self.options.sprint_field.is_empty() {
            fields.push(self.options.sprint_field.clone());
        }

        info!(jql = %jql, "Searching Jira issues");

        JiraIssues {
            reader: self,
            jql,
            fields,
            cursor: Some(PageCursor::Start),
            buffer: VecDeque::new(),
            fetched: 0,
        }
    }

    fn fetch_page(
        &self,
        jql: &str,
        fields: &[String],
        cursor: &PageCursor,
    ) -> migrate_core::Result<JiraSearchPage> {
        with_retry(&self.options.retry, "jira search", || {
            self.client
                .search_page(jql, fields, self.options.page_size, cursor)
                .map_err(MigrateError::from)
        })
    }

    /// Parse one raw issue, completing its comment list when truncated
    fn load_issue(&self, raw: serde_json::Value) -> migrate_core::Result<SourceIssue> {
        let key = raw
            .get("key")
            .and_then(|k| k.as_str())
            .unwrap_or("<unknown>")
            .to_string();

        let mut issue: JiraIssue = serde_json::from_value(raw).map_err(|e| {
            MigrateError::from(JiraError::InvalidIssue {
                key: key.clone(),
                reason: e.to_string(),
            })
        })?;

        if let Some(embedded) = issue.fields.comment.as_mut() {
            if embedded.is_truncated() {
                let comments = self.fetch_all_comments(&issue.key).map_err(|e| {
                    if e.is_fatal() {
                        e
                    } else {
                        MigrateError::InvalidIssue {
                            key: issue.key.clone(),
                            reason: format!("fetching comments: {}", e),
                        }
                    }
                })?;
                debug!(key = %issue.key, count = comments.len(), "Fetched full comment list");
                embedded.total = comments.len();
                embedded.start_at = 0;
                embedded.comments = comments;
            }
        }

        Ok(to_source_issue(issue, &self.options.sprint_field)?)
    }

    fn fetch_all_comments(&self, key: &str) -> migrate_core::Result<Vec<JiraComment>> {
        let mut comments = Vec::new();
        loop {
            let page = with_retry(&self.options.retry, "jira comments", || {
                self.client
                    .get_comments(key, comments.len(), COMMENT_PAGE_SIZE)
                    .map_err(MigrateError::from)
            })?;
            let count = page.comments.len();
            comments.extend(page.comments);
            if count == 0 || comments.len() >= page.total {
                return Ok(comments);
            }
        }
    }
}

impl IssueSource for JiraIssueReader {
    fn issues<'a>(
        &'a self,
        query: &str,
    ) -> Box<dyn Iterator<Item = migrate_core::Result<SourceIssue>> + 'a> {
        Box::new(self.search(query))
    }
}

/// Iterator over search results, fetching the next page when the buffer
/// runs dry.
///
/// A failed page yields a single error and ends the iteration; a malformed
/// issue yields an error for that issue only.
pub struct JiraIssues<'a> {
    reader: &'a JiraIssueReader,
    jql: String,
    fields: Vec<String>,
    /// `None` once the last page has been fetched
    cursor: Option<PageCursor>,
    buffer: VecDeque<serde_json::Value>,
    fetched: usize,
}

impl JiraIssues<'_> {
    fn next_cursor(&self, page: &JiraSearchPage, received: usize) -> Option<PageCursor> {
        if received == 0 {
            return None;
        }
        if let Some(token) = page.next_page_token.as_ref().filter(|t| !t.is_empty()) {
            return Some(PageCursor::Token(token.clone()));
        }
        if page.is_last == Some(true) {
            return None;
        }
        match page.total {
            Some(total) if self.fetched < total => Some(PageCursor::Offset(self.fetched)),
            Some(_) => None,
            // Neither a token nor a total: only a short page ends the listing
            None if received < self.reader.options.page_size => None,
            None => Some(PageCursor::Offset(self.fetched)),
        }
    }
}

impl Iterator for JiraIssues<'_> {
    type Item = migrate_core::Result<SourceIssue>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.buffer.is_empty() {
            let cursor = self.cursor.take()?;
            let page = match self.reader.fetch_page(&self.jql, &self.fields, &cursor) {
                Ok(page) => page,
                Err(e) => {
                    warn!(error = %e, "Jira search failed");
                    return Some(Err(e));
                }
            };

            let received = page.issues.len();
            self.fetched += received;
            debug!(received, fetched = self.fetched, total = ?page.total, "Fetched Jira page");

            self.cursor = self.next_cursor(&page, received);
            self.buffer.extend(page.issues);
        }

        let raw = self.buffer.pop_front()?;
        Some(self.reader.load_issue(raw))
    }
}
