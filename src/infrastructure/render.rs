//! # Attachment Rendering
//!
//! Matrix has no attachment concept, so attachments are rendered as markdown:
//! the pretext in bold, the two short columns as a table and error fields as a list.

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::types::{Attachment, Field};

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([^<>|\s]+)\|([^<>]+)>").expect("valid link regex"))
}

/// Turn `<url|text>` links into `[text](url)`.
pub fn markdown_links(text: &str) -> String {
    link_regex().replace_all(text, "[$2]($1)").into_owned()
}

pub fn attachments_to_markdown(attachments: &[Attachment]) -> String {
    attachments
        .iter()
        .map(attachment_to_markdown)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn attachment_to_markdown(attachment: &Attachment) -> String {
    let mut out = Vec::new();
    if let Some(pretext) = &attachment.pretext {
        out.push(format!("**{}**", pretext));
        out.push(String::new());
    }

    let (columns, details): (Vec<&Field>, Vec<&Field>) =
        attachment.fields.iter().partition(|f| f.short);

    if !columns.is_empty() {
        out.push(format!(
            "| {} |",
            columns.iter().map(|f| f.title.as_str()).collect::<Vec<_>>().join(" | ")
        ));
        out.push(format!("|{}", "---|".repeat(columns.len())));
        let cells: Vec<Vec<&str>> = columns.iter().map(|f| f.value.lines().collect()).collect();
        let rows = cells.iter().map(Vec::len).max().unwrap_or(0);
        for row in 0..rows {
            let line: Vec<String> = cells
                .iter()
                .map(|column| markdown_links(column.get(row).copied().unwrap_or("")))
                .collect();
            out.push(format!("| {} |", line.join(" | ")));
        }
    }

    if !details.is_empty() {
        out.push(String::new());
        for field in details {
            out.push(format!("* **{}**: {}", field.title, markdown_links(&field.value)));
        }
    }

    out.join("\n")
}
