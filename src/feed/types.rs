use serde::Serialize;

/// Channel-level metadata of an RSS 2.0 feed.
///
/// Every field defaults to empty when the source element is absent; absence
/// is never an error. Serializes with empty fields omitted and the keys in
/// the order the JSON output uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMetadata {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_build_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pub_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub language: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub managing_editor: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Non-empty `category` texts in document order.
    #[serde(rename = "category", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

/// A single `<item>` of a channel, flattened to plain strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pub_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    /// Text of the first `category` element only.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,
    /// Entity-unescaped, tag-stripped description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl FeedItem {
    /// True when every field is empty, i.e. the item would serialize to `{}`.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.author.is_empty()
            && self.pub_date.is_empty()
            && self.link.is_empty()
            && self.category.is_empty()
            && self.description.is_empty()
    }
}

/// Result of one pipeline run: metadata plus the selected items in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    pub metadata: FeedMetadata,
    pub items: Vec<FeedItem>,
}
