//! Atlassian Document Format to GitHub Markdown

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Render an ADF document (or an API v2 plain string) as Markdown
pub fn adf_to_markdown(doc: &Value) -> String {
    match doc {
        Value::String(text) => text.trim().to_string(),
        Value::Object(_) => render_blocks(children(doc))
            .join("\n\n")
            .trim()
            .to_string(),
        _ => String::new(),
    }
}

fn children(node: &Value) -> &[Value] {
    node.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn node_type(node: &Value) -> &str {
    node.get("type").and_then(Value::as_str).unwrap_or("")
}

fn attr<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    node.get("attrs").and_then(|a| a.get(name))
}

fn attr_str<'a>(node: &'a Value, name: &str) -> Option<&'a str> {
    attr(node, name).and_then(Value::as_str)
}

fn render_blocks(nodes: &[Value]) -> Vec<String> {
    nodes
        .iter()
        .map(render_block)
        .filter(|block| !block.trim().is_empty())
        .collect()
}

fn render_block(node: &Value) -> String {
    match node_type(node) {
        "paragraph" => render_inline(children(node)),
        "heading" => {
            let level = attr(node, "level")
                .and_then(Value::as_u64)
                .unwrap_or(1)
                .clamp(1, 6) as usize;
            format!("{} {}", "#".repeat(level), render_inline(children(node)))
        }
        "bulletList" => render_list(node, None),
        "orderedList" => {
            let start = attr(node, "order").and_then(Value::as_u64).unwrap_or(1);
            render_list(node, Some(start))
        }
        "codeBlock" => {
            let language = attr_str(node, "language").unwrap_or("");
            format!(
                "```{}\n{}\n```",
                language,
                plain_text(children(node)).trim_end_matches('\n')
            )
        }
        "blockquote" | "panel" => quote(&render_blocks(children(node)).join("\n\n")),
        "rule" => "---".to_string(),
        "table" => render_table(node),
        "mediaSingle" | "mediaGroup" | "media" => "_(attachment not migrated)_".to_string(),
        _ if !children(node).is_empty() => {
            // Unknown container: block children or inline children
            let nested = render_blocks(children(node));
            if nested.is_empty() {
                render_inline(children(node))
            } else {
                nested.join("\n\n")
            }
        }
        _ => render_inline_node(node),
    }
}

/// `start` is `Some(n)` for ordered lists
fn render_list(node: &Value, start: Option<u64>) -> String {
    children(node)
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = match start {
                Some(n) => format!("{}. ", n.saturating_add(i as u64)),
                None => "- ".to_string(),
            };
            let body = render_blocks(children(item)).join("\n");
            let indent = " ".repeat(marker.len());
            let mut lines = body.lines();
            let mut out = format!("{}{}", marker, lines.next().unwrap_or(""));
            for line in lines {
                out.push('\n');
                if !line.is_empty() {
                    out.push_str(&indent);
                    out.push_str(line);
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table(node: &Value) -> String {
    let rows: Vec<Vec<String>> = children(node)
        .iter()
        .map(|row| {
            children(row)
                .iter()
                .map(|cell| {
                    render_blocks(children(cell))
                        .join(" ")
                        .replace('\n', " ")
                        .replace('|', "\\|")
                })
                .collect()
        })
        .filter(|cells: &Vec<String>| !cells.is_empty())
        .collect();

    let Some(width) = rows.iter().map(Vec::len).max() else {
        return String::new();
    };

    let line = |cells: &[String]| {
        let mut padded: Vec<&str> = cells.iter().map(String::as_str).collect();
        padded.resize(width, "");
        format!("| {} |", padded.join(" | "))
    };

    let mut out = vec![line(&rows[0]), format!("|{}", " --- |".repeat(width))];
    out.extend(rows[1..].iter().map(|r| line(r)));
    out.join("\n")
}

fn quote(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_inline(nodes: &[Value]) -> String {
    nodes.iter().map(render_inline_node).collect()
}

fn render_inline_node(node: &Value) -> String {
    match node_type(node) {
        "text" => {
            let text = node.get("text").and_then(Value::as_str).unwrap_or("");
            apply_marks(text, node.get("marks").and_then(Value::as_array))
        }
        "hardBreak" => "\n".to_string(),
        // Code span so the Jira display name never pings a GitHub user
        "mention" => {
            let name = attr_str(node, "text").unwrap_or("unknown user");
            format!("`@{}`", name.trim_start_matches('@'))
        }
        "emoji" => attr_str(node, "text")
            .or_else(|| attr_str(node, "shortName"))
            .unwrap_or("")
            .to_string(),
        "inlineCard" | "blockCard" => attr_str(node, "url")
            .map(|url| format!("<{}>", url))
            .unwrap_or_default(),
        "status" => attr_str(node, "text")
            .map(|text| format!("`{}`", text))
            .unwrap_or_default(),
        "date" => attr_str(node, "timestamp")
            .and_then(|ms| ms.parse::<i64>().ok())
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        _ => render_inline(children(node)),
    }
}

fn apply_marks(text: &str, marks: Option<&Vec<Value>>) -> String {
    let Some(marks) = marks else {
        return text.to_string();
    };

    let mut out = text.to_string();
    let mut href = None;
    for mark in marks {
        match node_type(mark) {
            "code" => out = format!("`{}`", out),
            "strong" => out = format!("**{}**", out),
            "em" => out = format!("*{}*", out),
            "strike" => out = format!("~~{}~~", out),
            "link" => href = attr_str(mark, "href"),
            _ => {}
        }
    }

    match href {
        Some(href) => format!("[{}]({})", out, href),
        None => out,
    }
}

/// Raw text content, for code blocks
fn plain_text(nodes: &[Value]) -> String {
    nodes
        .iter()
        .map(|node| match node.get("text").and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None if node_type(node) == "hardBreak" => "\n".to_string(),
            None => plain_text(children(node)),
        })
        .collect()
}
