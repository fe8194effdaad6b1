//! Fetch settings for the command-line shell.
//!
//! There is no configuration file: the CLI flags select what to print and
//! everything here is a fixed default passed explicitly into
//! [`crate::feed::fetch_feed`].
use std::time::Duration;

/// Browser-like User-Agent sent with every feed request. Some publishers
/// refuse requests from unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (HTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Settings for the single HTTP GET of a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Value of the `User-Agent` request header.
    pub user_agent: String,

    /// Upper bound for the whole request, body included.
    pub timeout: Duration,

    /// Largest accepted response body in bytes.
    pub max_body_size: usize,
}

impl FetchConfig {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            max_body_size: Self::DEFAULT_MAX_BODY_SIZE,
        }
    }
}
