//! Operator-supplied Jira to GitHub username mapping

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{MigrateError, Result};

/// Read-only mapping from Jira account id to GitHub login
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsernameMap {
    entries: BTreeMap<String, String>,
}

impl UsernameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a mapping file.
    ///
    /// Accepts either a flat table (`"jira-id" = "github-login"`) or the same
    /// entries nested under a `[users]` table, so a full config file works too.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MigrateError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| MigrateError::Validation(format!("{}: {}", path.display(), e)))
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
        let table = match table.get("users") {
            Some(toml::Value::Table(users)) => users.clone(),
            Some(_) => return Err("`users` must be a table".to_string()),
            None => table,
        };

        let mut entries = BTreeMap::new();
        for (jira_id, value) in table {
            match value {
                toml::Value::String(login) if !login.trim().is_empty() => {
                    entries.insert(jira_id, login.trim().trim_start_matches('@').to_string());
                }
                _ => {
                    return Err(format!(
                        "entry `{}` must map to a non-empty GitHub login",
                        jira_id
                    ));
                }
            }
        }
        Ok(Self { entries })
    }

    /// GitHub login for a Jira user id
    pub fn get(&self, jira_id: &str) -> Option<&str> {
        self.entries.get(jira_id).map(String::as_str)
    }

    /// Add entries from `other`, which win on conflicts
    pub fn extend(&mut self, other: UsernameMap) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UsernameMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
