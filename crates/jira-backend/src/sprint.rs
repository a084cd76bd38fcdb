//! Sprint custom field parsing
//!
//! Jira Cloud returns the sprint field as an array of objects. Older
//! instances (and some exports) return GreenHopper's `toString()` form:
//! `com.atlassian.greenhopper.service.sprint.Sprint@1a2b[id=1,state=CLOSED,name=Sprint 1,...]`.

use chrono::{DateTime, Utc};
use migrate_core::Sprint;
use serde_json::Value;

use crate::convert::parse_jira_datetime;

/// Default custom field id of the sprint field on Jira Cloud
pub const DEFAULT_SPRINT_FIELD: &str = "customfield_10020";

/// Parse the sprint field value. The first listed sprint is used.
pub fn parse_sprint_field(value: &Value) -> Option<Sprint> {
    match value {
        Value::Array(items) => items.iter().find_map(parse_sprint_field),
        Value::Object(_) => sprint_from_object(value),
        Value::String(s) => parse_greenhopper(s),
        _ => None,
    }
}

fn sprint_from_object(value: &Value) -> Option<Sprint> {
    let name = value.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Some(Sprint {
        id: value.get("id").and_then(Value::as_u64),
        name: name.to_string(),
        goal: text("goal"),
        state: text("state").map(|s| s.to_lowercase()),
        end_date: text("endDate").as_deref().and_then(parse_date),
    })
}

/// Parse GreenHopper's `Sprint@hash[key=value,...]` string
fn parse_greenhopper(raw: &str) -> Option<Sprint> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }
    let inner = &raw[start + 1..end];

    // Values (goals especially) may contain commas; a part only starts a new
    // field when it looks like `identifier=`.
    let mut fields: Vec<(String, String)> = Vec::new();
    for part in inner.split(',') {
        match part.split_once('=') {
            Some((key, value)) if is_field_key(key) => {
                fields.push((key.to_string(), value.to_string()));
            }
            _ => {
                if let Some((_, value)) = fields.last_mut() {
                    value.push(',');
                    value.push_str(part);
                }
            }
        }
    }

    let get = |key: &str| {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty() && *v != "<null>")
    };

    let name = get("name")?;
    Some(Sprint {
        id: get("id").and_then(|v| v.parse().ok()),
        name: name.to_string(),
        goal: get("goal").map(str::to_string),
        state: get("state").map(str::to_lowercase),
        end_date: get("endDate").and_then(parse_date),
    })
}

fn is_field_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric())
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    parse_jira_datetime(Some(value))
}
