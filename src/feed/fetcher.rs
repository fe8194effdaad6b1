use futures::StreamExt;
use reqwest::header::USER_AGENT;
use thiserror::Error;

use crate::config::FetchConfig;
use crate::util::{validate_url, UrlValidationError};

/// Errors that can occur while downloading a feed document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source is not an absolute http(s) URL
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the configured size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Builds the HTTP client used for feed downloads.
pub fn build_client(config: &FetchConfig) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

/// Downloads the feed at `url` and returns its body as text.
///
/// Sends a single GET carrying `config.user_agent`. There is no retry: any
/// failure is returned to the caller as-is.
///
/// # Errors
///
/// - [`FetchError::InvalidUrl`] - `url` is not http(s)
/// - [`FetchError::Network`] - Connection or TLS errors
/// - [`FetchError::Timeout`] - Request exceeded `config.timeout`
/// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
/// - [`FetchError::ResponseTooLarge`] - Body exceeded `config.max_body_size`
/// - [`FetchError::IncompleteResponse`] - Body shorter than Content-Length
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    config: &FetchConfig,
) -> Result<String, FetchError> {
    let url = validate_url(url)?;

    let response = tokio::time::timeout(
        config.timeout,
        client
            .get(url.clone())
            .header(USER_AGENT, config.user_agent.as_str())
            .send(),
    )
    .await
    .map_err(|_| FetchError::Timeout)?
    .map_err(FetchError::Network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let bytes = read_limited_bytes(response, config.max_body_size).await?;
    tracing::debug!(url = %url, status = %status, bytes = bytes.len(), "Fetched feed");

    Ok(decode_body(bytes))
}

fn decode_body(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                valid_up_to = e.utf8_error().valid_up_to(),
                "Feed body is not valid UTF-8, replacing invalid sequences"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    // A truncated body must not reach the XML parser, where it would be
    // reported as malformed input instead of a failed download
    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_USER_AGENT;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Test</title>
    <item><title>First</title></item>
</channel></rss>"#;

    fn client() -> reqwest::Client {
        build_client(&FetchConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success_sends_user_agent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .insert_header("Content-Type", "application/rss+xml"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let body = fetch_feed(
            &client(),
            &format!("{}/feed", mock_server.uri()),
            &FetchConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(body, VALID_RSS);

        let requests = mock_server.received_requests().await.unwrap();
        let user_agent = requests[0]
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok());
        assert_eq!(user_agent, Some(DEFAULT_USER_AGENT));
    }

    #[tokio::test]
    async fn test_fetch_404_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = fetch_feed(
            &client(),
            &format!("{}/feed", mock_server.uri()),
            &FetchConfig::default(),
        )
        .await;
        match result.unwrap_err() {
            FetchError::HttpStatus(404) => {}
            e => panic!("Expected HttpStatus(404), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_fetch_500_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = fetch_feed(
            &client(),
            &format!("{}/feed", mock_server.uri()),
            &FetchConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(FetchError::HttpStatus(500))));
    }

    #[tokio::test]
    async fn test_fetch_body_too_large() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
            .mount(&mock_server)
            .await;

        let config = FetchConfig {
            max_body_size: 16,
            ..FetchConfig::default()
        };
        let result = fetch_feed(&client(), &mock_server.uri(), &config).await;
        assert!(matches!(result, Err(FetchError::ResponseTooLarge)));
    }

    #[tokio::test]
    async fn test_fetch_invalid_utf8_is_replaced() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<rss>\xff</rss>".to_vec()))
            .mount(&mock_server)
            .await;

        let body = fetch_feed(&client(), &mock_server.uri(), &FetchConfig::default())
            .await
            .unwrap();
        assert_eq!(body, "<rss>\u{fffd}</rss>");
    }

    #[tokio::test]
    async fn test_fetch_truncated_body_is_fetch_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 500\r\nConnection: close\r\n\r\n<rss><channel>")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let result = fetch_feed(&client(), &format!("http://{}/feed", addr), &FetchConfig::default()).await;
        match result {
            Err(FetchError::IncompleteResponse { expected: 500, .. }) | Err(FetchError::Network(_)) => {}
            other => panic!("Expected a fetch error for a truncated body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_http_scheme() {
        let result = fetch_feed(&client(), "file:///etc/passwd", &FetchConfig::default()).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
