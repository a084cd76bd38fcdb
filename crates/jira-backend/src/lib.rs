//! Jira Cloud issue reader
//!
//! Talks to the Jira REST API v3 and turns issues into
//! [`migrate_core::SourceIssue`] records, converting ADF bodies to Markdown
//! and the sprint custom field to a [`migrate_core::Sprint`].

pub mod adf;
pub mod client;
mod convert;
pub mod error;
pub mod models;
pub mod reader;
pub mod sprint;

#[cfg(test)]
mod client_tests;

pub use client::JiraClient;
pub use convert::parse_jira_datetime;
pub use error::{JiraError, Result};
pub use models::*;
pub use reader::{DEFAULT_JQL, DEFAULT_PAGE_SIZE, JiraIssueReader, JiraIssues, ReaderOptions};
pub use sprint::DEFAULT_SPRINT_FIELD;
