//! GitHub Issues writer
//!
//! A blocking REST client for one repository plus its
//! [`migrate_core::IssueTarget`] implementation.

pub mod client;
pub mod error;
pub mod models;
mod trait_impl;


pub use client::{GitHubClient, label_color};
pub use error::{GitHubError, Result};
pub use models::*;

/// Split `owner/repo` into its two parts
pub fn parse_repo_slug(slug: &str) -> Option<(&str, &str)> {
    let (owner, repo) = slug.trim().trim_end_matches('/').split_once('/')?;
    let valid = |part: &str| !part.is_empty() && !part.contains('/') && !part.contains(' ');
    (valid(owner) && valid(repo)).then_some((owner, repo))
}
