use crate::cli::Cli;
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use jira_backend::{DEFAULT_PAGE_SIZE, DEFAULT_SPRINT_FIELD};
use migrate_core::{RetryConfig, UsernameMap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Jira search pages are capped at 100 issues
const MAX_PAGE_SIZE: usize = 100;

/// Settings for one migration run
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub jira_server: Option<String>,
    pub jira_username: Option<String>,
    pub jira_token: Option<String>,
    pub jira_search: Option<String>,
    pub github_token: Option<String>,
    pub github_repo: Option<String>,
    pub github_api_url: String,
    pub sprint_field: String,
    pub page_size: usize,
    pub skip_projects: bool,
    pub user_map: Option<PathBuf>,
    /// Inline username mapping, overridden by `user_map` entries
    pub users: BTreeMap<String, String>,
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jira_server: None,
            jira_username: None,
            jira_token: None,
            jira_search: None,
            github_token: None,
            github_repo: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            sprint_field: DEFAULT_SPRINT_FIELD.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            skip_projects: false,
            user_map: None,
            users: BTreeMap::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Layer defaults, config files and `JIRA2GH_*` variables.
    ///
    /// Nested keys use a double underscore: `JIRA2GH_RETRY__MAX_RETRIES=5`.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(config_path) {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed("JIRA2GH_").split("__"));

        figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))
    }

    pub fn merge_with_cli(&mut self, cli: &Cli) {
        let overrides = [
            (&mut self.jira_server, &cli.jira_server),
            (&mut self.jira_username, &cli.jira_username),
            (&mut self.jira_token, &cli.jira_token),
            (&mut self.jira_search, &cli.jira_search),
            (&mut self.github_token, &cli.github_token),
            (&mut self.github_repo, &cli.github_repo),
        ];
        for (setting, value) in overrides {
            if let Some(value) = value {
                *setting = Some(value.clone());
            }
        }

        if let Some(url) = &cli.github_api_url {
            self.github_api_url = url.clone();
        }
        if let Some(field) = &cli.sprint_field {
            self.sprint_field = field.clone();
        }
        if let Some(size) = cli.page_size {
            self.page_size = size;
        }
        if let Some(path) = &cli.user_map {
            self.user_map = Some(path.clone());
        }
        if cli.skip_projects {
            self.skip_projects = true;
        }
    }

    /// Report every missing or invalid setting at once, by flag name.
    ///
    /// The GitHub token is not needed for a dry run.
    pub fn validate(&self, dry_run: bool) -> Result<()> {
        let mut missing = Vec::new();
        let mut check = |value: &Option<String>, flag: &'static str| {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                missing.push(flag);
            }
        };
        check(&self.jira_server, "--jira_server");
        check(&self.jira_username, "--jira_username");
        check(&self.jira_token, "--jira_token");
        if !dry_run {
            check(&self.github_token, "--github_token");
        }
        check(&self.github_repo, "--github_repo");

        if !missing.is_empty() {
            return Err(anyhow!(
                "Missing required settings: {}. Set them as flags, JIRA2GH_* environment variables, or in the config file",
                missing.join(", ")
            ));
        }

        if let Some(repo) = &self.github_repo {
            if github_backend::parse_repo_slug(repo).is_none() {
                return Err(anyhow!(
                    "Invalid --github_repo '{}': expected OWNER/REPO",
                    repo
                ));
            }
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(anyhow!(
                "Invalid --page_size {}: must be between 1 and {}",
                self.page_size,
                MAX_PAGE_SIZE
            ));
        }

        if self.sprint_field.trim().is_empty() {
            return Err(anyhow!("--sprint_field must not be empty"));
        }

        Ok(())
    }

    /// Inline `[users]` entries, then the `--user_map` file on top
    pub fn username_map(&self) -> Result<UsernameMap> {
        let mut users: UsernameMap = self
            .users
            .iter()
            .map(|(jira, github)| (jira.trim(), github.trim().trim_start_matches('@')))
            .filter(|(_, github)| !github.is_empty())
            .collect();

        if let Some(path) = &self.user_map {
            let from_file = UsernameMap::load(path)
                .with_context(|| format!("Failed to load user map {}", path.display()))?;
            users.extend(from_file);
        }

        Ok(users)
    }
}

/// Explicit path only, else the user config dir and then the working directory
fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }

    let mut paths = Vec::new();
    if let Some(dirs) = ProjectDirs::from("", "", "jira2gh") {
        paths.push(dirs.config_dir().join("config.toml"));
    }
    if let Ok(dir) = std::env::current_dir() {
        paths.push(dir.join("jira2gh.toml"));
    }
    paths
}
