use crate::cli::OutputFormat;
use crate::migrate::RunSummary;
use colored::Colorize;
use serde::Serialize;

pub fn output_summary(summary: &RunSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(summary) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => println!("{}", summary_text(summary)),
    }
}

fn summary_text(summary: &RunSummary) -> String {
    let mut lines = Vec::new();

    if summary.dry_run {
        lines.push(format!(
            "{} {} issue(s) would be created",
            "Dry run:".cyan().bold(),
            summary.planned.len()
        ));
        for issue in &summary.planned {
            let mut line = format!("  {} {}", issue.source_key.cyan(), issue.title);
            if let Some(milestone) = &issue.milestone {
                line.push_str(&format!(" [{}]", milestone.title.magenta()));
            }
            if let Some(assignee) = &issue.assignee {
                line.push_str(&format!(" ({})", assignee.dimmed()));
            }
            lines.push(line);
        }
    } else {
        lines.push(format!(
            "{} {} issue(s)",
            "Migrated".green().bold(),
            summary.migrated.len()
        ));
        for outcome in &summary.migrated {
            let target = outcome
                .url
                .clone()
                .unwrap_or_else(|| format!("#{}", outcome.number));
            lines.push(format!("  {} -> {}", outcome.source_key.cyan(), target));
            for warning in &outcome.warnings {
                lines.push(format!("    {} {}", "warning:".yellow(), warning));
            }
        }
    }

    if !summary.failed.is_empty() {
        lines.push(format!(
            "{} {} issue(s)",
            "Failed".red().bold(),
            summary.failed.len()
        ));
        for failed in &summary.failed {
            lines.push(format!("  {}: {}", failed.key.cyan(), failed.error));
        }
    }

    let warnings = summary.warning_count();
    if warnings > 0 {
        lines.push(format!("{} {}", "Warnings:".yellow().bold(), warnings));
    }

    if let Some(reason) = &summary.aborted {
        lines.push(format!("{} {}", "Aborted:".red().bold(), reason));
    }

    lines.join("\n")
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: "error".to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err)
                .unwrap_or_else(|_| format!(r#"{{"error": true, "message": "{}"}}"#, err))
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::FailedIssue;
    use migrate_core::WriteOutcome;

    #[test]
    fn text_summary_lists_outcomes_and_failures() {
        colored::control::set_override(false);
        let summary = RunSummary {
            migrated: vec![WriteOutcome {
                source_key: "PROJ-1".to_string(),
                number: 7,
                url: None,
                warnings: vec!["add comment 1: HTTP 500".to_string()],
            }],
            failed: vec![FailedIssue {
                key: "PROJ-2".to_string(),
                error: "Validation failed: title".to_string(),
            }],
            ..Default::default()
        };

        let text = summary_text(&summary);

        assert!(text.contains("Migrated 1 issue(s)"));
        assert!(text.contains("PROJ-1 -> #7"));
        assert!(text.contains("warning: add comment 1: HTTP 500"));
        assert!(text.contains("PROJ-2: Validation failed: title"));
        assert!(text.contains("Warnings: 1"));
    }
}
