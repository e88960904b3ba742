//! HTTP client for page retrieval
//!
//! - `config`: HTTP client configuration and building
//!
//! The same client is shared with the bulk downloader, so its timeout is the
//! per-request timeout for every image fetch as well.

use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::errors::{ClientError, ClientResult};

pub mod config;

pub use config::ClientConfig;

/// Parse a user-supplied page URL
pub fn parse_url(url: &str) -> ClientResult<Url> {
    Url::parse(url).map_err(|e| ClientError::InvalidUrl {
        url: url.to_string(),
        error: e.to_string(),
    })
}

/// Fetches the text content of a web page
///
/// # Errors
///
/// Returns `ClientError` if the request fails or the server answers with a
/// non-success status.
pub async fn fetch_page(client: &Client, url: &Url) -> ClientResult<String> {
    let response = client.get(url.as_str()).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(ClientError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let text = response.text().await?;
    debug!("Fetched page {} ({} bytes)", url, text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_url() {
        let parsed = parse_url("https://example.com/gallery").unwrap();
        assert_eq!(parsed.host_str(), Some("example.com"));

        match parse_url("not-a-url") {
            Err(ClientError::InvalidUrl { url, .. }) => assert_eq!(url, "not-a-url"),
            other => panic!("Expected ClientError::InvalidUrl, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gallery"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<img src=\"a.png\">"))
            .mount(&mock_server)
            .await;

        let client = ClientConfig::default().build_http_client().unwrap();
        let url = parse_url(&format!("{}/gallery", mock_server.uri())).unwrap();

        let body = fetch_page(&client, &url).await.unwrap();
        assert_eq!(body, "<img src=\"a.png\">");
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = ClientConfig::default().build_http_client().unwrap();
        let url = parse_url(&format!("{}/missing", mock_server.uri())).unwrap();

        match fetch_page(&client, &url).await {
            Err(ClientError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected ClientError::Status, got {:?}", other),
        }
    }
}
