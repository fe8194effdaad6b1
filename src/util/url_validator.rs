use thiserror::Error;
use url::Url;

/// Errors that can occur while validating a feed source URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Validates a URL string for use as a feed source.
///
/// The user names the feed on the command line, so local and private hosts
/// are allowed; only the scheme is restricted, keeping `file://` and other
/// non-HTTP sources out of the fetch path.
///
/// # Errors
///
/// - [`UrlValidationError::InvalidUrl`] if the string is not an absolute URL
/// - [`UrlValidationError::UnsupportedScheme`] if the scheme is not `http` or `https`
///
/// # Examples
///
/// ```
/// use rss_reader::util::validate_url;
///
/// let url = validate_url("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_url("file:///etc/passwd").is_err());
/// assert!(validate_url("example.com/feed").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}
