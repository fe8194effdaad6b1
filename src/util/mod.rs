//! Text and URL helpers shared by the feed pipeline.
//!
//! - **HTML handling**: entity unescaping and the best-effort tag stripper
//! - **URL validation**: restricts feed sources to http(s)
//!
//! # Examples
//!
//! ```
//! use rss_reader::util::{clean_description, validate_url};
//!
//! assert_eq!(clean_description("&lt;b&gt;Bold&lt;/b&gt; move"), "Bold move");
//! assert!(validate_url("https://example.com/rss").is_ok());
//! ```

mod html;
mod url_validator;

pub use html::{clean_description, strip_html_tags, unescape_entities};
pub use url_validator::{validate_url, UrlValidationError};
