//! Output rendering: one pretty-printed JSON document or plain-text lines.
//!
//! Both renderers take an already parsed feed and never fail on content;
//! only JSON serialization can return an error.

use serde::Serialize;

use crate::feed::{FeedItem, FeedMetadata, ParsedFeed};
use crate::util::strip_html_tags;

/// Output mode selected by the `--json` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Plain
        }
    }
}

/// Renders `feed` in the requested format.
///
/// JSON mode always yields exactly one element holding the whole
/// (multi-line) document.
pub fn render(feed: &ParsedFeed, format: OutputFormat) -> Result<Vec<String>, serde_json::Error> {
    match format {
        OutputFormat::Json => to_json_lines(feed),
        OutputFormat::Plain => Ok(to_plain_lines(feed)),
    }
}

/// Shape of the JSON document: metadata keys, then `items` when at least
/// one item has a non-empty field.
#[derive(Serialize)]
struct JsonFeed<'a> {
    #[serde(flatten)]
    metadata: &'a FeedMetadata,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    items: Vec<&'a FeedItem>,
}

/// Serializes `feed` as 2-space indented JSON with empty fields omitted.
/// Non-ASCII text is written as literal UTF-8.
pub fn to_json_lines(feed: &ParsedFeed) -> Result<Vec<String>, serde_json::Error> {
    let document = JsonFeed {
        metadata: &feed.metadata,
        items: feed.items.iter().filter(|item| !item.is_empty()).collect(),
    };
    Ok(vec![serde_json::to_string_pretty(&document)?])
}

/// Formats `feed` as human-readable `Label:value` lines.
///
/// Optional header fields are skipped when empty; `Feed:`, `Link:` and
/// `Description:` are always present. One blank line separates the header
/// from the items and each item block starts with a further blank line.
pub fn to_plain_lines(feed: &ParsedFeed) -> Vec<String> {
    let metadata = &feed.metadata;
    let mut lines = Vec::new();

    lines.push(format!("Feed:{}", metadata.title));
    lines.push(format!("Link:{}", metadata.link));
    push_optional(&mut lines, "LastBuildDate", &metadata.last_build_date);
    push_optional(&mut lines, "PublishDate", &metadata.pub_date);
    push_optional(&mut lines, "Language", &metadata.language);
    push_optional(&mut lines, "Categories", &metadata.categories.join(","));
    push_optional(&mut lines, "Editor", &metadata.managing_editor);
    lines.push(format!("Description:{}", metadata.description));

    if !feed.items.is_empty() {
        lines.push(String::new());
    }

    for item in &feed.items {
        lines.push(String::new());
        lines.push(format!("Title:{}", item.title));
        push_optional(&mut lines, "Author", &item.author);
        push_optional(&mut lines, "Published", &item.pub_date);
        lines.push(format!("Link:{}", item.link));
        push_optional(&mut lines, "Categories", &item.category);
        if !item.description.is_empty() {
            lines.push(String::new());
            lines.push(strip_html_tags(&item.description).into_owned());
        }
    }

    lines
}

fn push_optional(lines: &mut Vec<String>, label: &str, value: &str) {
    if !value.is_empty() {
        lines.push(format!("{}:{}", label, value));
    }
}
