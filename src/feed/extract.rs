use super::parser::XmlElement;
use super::types::{FeedItem, FeedMetadata};
use crate::util::clean_description;

/// Reads channel-level fields. Missing elements become empty strings and
/// `category` elements without text are skipped.
pub fn extract_metadata(channel: &XmlElement) -> FeedMetadata {
    let text = |name: &str| channel.find_text(name).to_string();

    FeedMetadata {
        title: text("title"),
        link: text("link"),
        last_build_date: text("lastBuildDate"),
        pub_date: text("pubDate"),
        language: text("language"),
        managing_editor: text("managingEditor"),
        description: text("description"),
        categories: channel
            .find_all("category")
            .map(XmlElement::text)
            .filter(|category| !category.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Converts an `<item>` element into a [`FeedItem`].
///
/// The description is HTML-entity-unescaped and then passed through the
/// best-effort tag stripper, see [`crate::util::strip_html_tags`].
pub fn extract_item(item: &XmlElement) -> FeedItem {
    let text = |name: &str| item.find_text(name).to_string();

    FeedItem {
        title: text("title"),
        author: text("author"),
        pub_date: text("pubDate"),
        link: text("link"),
        category: text("category"),
        description: clean_description(item.find_text("description")),
    }
}
