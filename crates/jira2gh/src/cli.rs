use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Copy every Jira issue matching a search into a GitHub repository.
///
/// Sprints become milestones, issue types and labels become labels, and
/// workflow states become columns on a per-project board.
#[derive(Parser, Debug)]
#[command(name = "jira2gh", version, about = "Migrate Jira Cloud issues to GitHub Issues")]
pub struct Cli {
    /// Output format of the run summary
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "JIRA2GH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Jira Cloud base URL, e.g. https://acme.atlassian.net
    #[arg(long = "jira_server", value_name = "URL")]
    pub jira_server: Option<String>,

    /// Jira account email
    #[arg(long = "jira_username", value_name = "EMAIL")]
    pub jira_username: Option<String>,

    /// Jira API token
    #[arg(long = "jira_token", env = "JIRA_TOKEN", hide_env_values = true)]
    pub jira_token: Option<String>,

    /// JQL selecting the issues to migrate (default: every issue, oldest first)
    #[arg(long = "jira_search", value_name = "JQL")]
    pub jira_search: Option<String>,

    /// GitHub access token with repo scope
    #[arg(long = "github_token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Target repository
    #[arg(long = "github_repo", value_name = "OWNER/REPO")]
    pub github_repo: Option<String>,

    /// GitHub API base URL, for GitHub Enterprise
    #[arg(long = "github_api_url", value_name = "URL")]
    pub github_api_url: Option<String>,

    /// TOML file mapping Jira account ids to GitHub logins
    #[arg(long = "user_map", value_name = "PATH")]
    pub user_map: Option<PathBuf>,

    /// Custom field holding the sprint
    #[arg(long = "sprint_field", value_name = "FIELD")]
    pub sprint_field: Option<String>,

    /// Issues fetched per Jira search page (1-100)
    #[arg(long = "page_size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Do not create project boards or cards
    #[arg(long = "skip_projects")]
    pub skip_projects: bool,

    /// Read and map issues without writing anything to GitHub
    #[arg(long = "dry_run")]
    pub dry_run: bool,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}
