//! Command-line RSS 2.0 reader.
//!
//! The library holds the whole transformation pipeline, a pure function
//! from feed text to output lines:
//!
//! ```text
//! xml text -> channel -> metadata + items -> filter -> limit -> records -> lines
//! ```
//!
//! The binary adds the fetch over HTTP and printing.
//!
//! # Example
//!
//! ```
//! let xml = "<rss><channel><title>T</title><link>http://x</link>\
//!            <description>D</description></channel></rss>";
//! let lines = rss_reader::rss_parser(xml, None, false, None).unwrap();
//! assert_eq!(lines, ["Feed:T", "Link:http://x", "Description:D"]);
//! ```

pub mod config;
pub mod feed;
pub mod render;
pub mod util;

pub use feed::{parse_feed, FeedError, FeedItem, FeedMetadata, ParseOptions, ParsedFeed};
pub use render::{render, OutputFormat};

/// Runs the full pipeline over `xml`.
///
/// # Arguments
///
/// * `xml` - RSS 2.0 document text
/// * `limit` - Keep only the first `limit` items after filtering; `None` keeps all
/// * `json` - Render one JSON document instead of plain-text lines
/// * `category` - Substring filter on each item's first category; `None`
///   or an empty string disables it
///
/// # Errors
///
/// Any [`FeedError`]; nothing is rendered when parsing fails.
pub fn rss_parser(
    xml: &str,
    limit: Option<usize>,
    json: bool,
    category: Option<&str>,
) -> Result<Vec<String>, FeedError> {
    let options = ParseOptions { limit, category };
    let feed = parse_feed(xml, &options)?;

    tracing::debug!(
        title = %feed.metadata.title,
        items = feed.items.len(),
        json = json,
        "Rendering feed"
    );
    Ok(render(&feed, OutputFormat::from_json_flag(json))?)
}
