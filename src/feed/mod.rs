//! RSS 2.0 feed pipeline: parsing, extraction, item selection and fetching.
//!
//! - [`parser`] - XML tree building over `quick-xml` and `channel` lookup
//! - [`extract`] - Channel metadata and item records
//! - [`filter`] - Category filter and limit over the item list
//! - [`fetcher`] - Single HTTP GET of the feed document
//!
//! # Example
//!
//! ```
//! use rss_reader::feed::{parse_feed, ParseOptions};
//!
//! let xml = "<rss><channel><title>T</title><item><title>One</title></item></channel></rss>";
//! let feed = parse_feed(xml, &ParseOptions::default()).unwrap();
//! assert_eq!(feed.metadata.title, "T");
//! assert_eq!(feed.items[0].title, "One");
//! ```

pub mod extract;
pub mod fetcher;
pub mod filter;
pub mod parser;
mod types;

use thiserror::Error;

pub use extract::{extract_item, extract_metadata};
pub use fetcher::{build_client, fetch_feed, FetchError};
pub use filter::{apply_limit, filter_by_category, select_items};
pub use parser::{parse_channel, XmlElement};
pub use types::{FeedItem, FeedMetadata, ParsedFeed};

/// Errors that abort a pipeline run. There is no partial output.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The input is not well-formed XML.
    #[error("XML parse error: {0}")]
    MalformedInput(String),

    /// Well-formed XML without a `channel` element.
    #[error("no channel element found")]
    MissingChannel,

    /// The JSON document could not be serialized.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Item selection applied between extraction and rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions<'a> {
    /// Keep only the first `limit` items (after category filtering).
    pub limit: Option<usize>,
    /// Case-sensitive substring matched against each item's first category.
    /// `None` or `Some("")` disables the filter.
    pub category: Option<&'a str>,
}

/// Parses `xml` into a [`ParsedFeed`], applying `options` to the items.
///
/// # Errors
///
/// Returns [`FeedError::MalformedInput`] or [`FeedError::MissingChannel`]
/// from [`parse_channel`].
pub fn parse_feed(xml: &str, options: &ParseOptions<'_>) -> Result<ParsedFeed, FeedError> {
    let channel = parse_channel(xml)?;
    let metadata = extract_metadata(&channel);
    let items = select_items(&channel, options.category, options.limit)
        .into_iter()
        .map(extract_item)
        .collect();

    Ok(ParsedFeed { metadata, items })
}
