use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use skulk_core::queue::Fetcher;
use skulk_core::response::{FetchOutcome, PageSnapshot};
use skulk_core::status::StatusCode;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::page;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sequential HTTP fetch delegate. HTTP error statuses come back as
/// outcome data; only transport failures populate the error field.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, follow_redirects: bool) -> Result<Self, FetchError> {
        Self::with_timeout(user_agent, follow_redirects, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        user_agent: &str,
        follow_redirects: bool,
        timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let redirect = if follow_redirects {
            Policy::limited(5)
        } else {
            Policy::none()
        };
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs / 2))
            .redirect(redirect)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        debug!(url, "fetching");
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(url, %err, "fetch failed");
                return FetchOutcome::transport_error(err.to_string());
            }
        };
        let status =
            StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::Unknown);
        if !response.status().is_success() {
            return FetchOutcome::status_only(status);
        }
        let final_url = response.url().to_string();
        let html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("text/html") || value.contains("application/xhtml"));
        if !html {
            return FetchOutcome::with_page(status, PageSnapshot::asset(final_url));
        }
        match response.text().await {
            Ok(body) => {
                let links = page::extract_links(&body);
                FetchOutcome::with_page(status, PageSnapshot::html(final_url, links, body))
            }
            Err(err) => FetchOutcome {
                status,
                error: Some(err.to_string()),
                page: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn html_response(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
    }

    #[tokio::test]
    async fn test_fetch_html_page_extracts_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(html_response(
                r#"<html><body>
                    <a href="/a">A</a>
                    <a href="b.html">B</a>
                    <a href="https://elsewhere.example/">out</a>
                </body></html>"#,
            ))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("test-agent", false).unwrap();
        let outcome = fetcher.fetch(&format!("{}/", server.uri())).await;

        assert_eq!(outcome.status, StatusCode::Exact(200));
        assert!(outcome.error.is_none());
        let page = outcome.page.expect("should have a page");
        assert!(!page.is_asset);
        assert_eq!(
            page.links,
            vec!["/a", "b.html", "https://elsewhere.example/"]
        );
    }

    #[tokio::test]
    async fn test_fetch_error_status_has_no_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("test-agent", false).unwrap();
        let outcome = fetcher.fetch(&format!("{}/missing", server.uri())).await;

        assert_eq!(outcome.status, StatusCode::Exact(404));
        assert!(outcome.error.is_none());
        assert!(outcome.page.is_none());
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_fetch_non_html_is_an_asset() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/image.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(vec![0x89, 0x50, 0x4e, 0x47]),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("test-agent", false).unwrap();
        let outcome = fetcher.fetch(&format!("{}/image.png", server.uri())).await;

        let page = outcome.page.expect("should have a page");
        assert!(page.is_asset);
        assert!(page.links.is_empty());
    }

    #[tokio::test]
    async fn test_redirects_followed_when_enabled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(html_response("<html><body>landed</body></html>"))
            .mount(&server)
            .await;

        let following = HttpFetcher::new("test-agent", true).unwrap();
        let outcome = following.fetch(&format!("{}/old", server.uri())).await;
        assert_eq!(outcome.status, StatusCode::Exact(200));
        let page = outcome.page.expect("should have a page");
        assert!(page.final_url.ends_with("/new"));

        let stationary = HttpFetcher::new("test-agent", false).unwrap();
        let outcome = stationary.fetch(&format!("{}/old", server.uri())).await;
        assert_eq!(outcome.status, StatusCode::Exact(301));
        assert!(outcome.page.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_captured() {
        let fetcher = HttpFetcher::with_timeout("test-agent", false, 2).unwrap();
        let outcome = fetcher.fetch("http://127.0.0.1:1/unreachable").await;

        assert_eq!(outcome.status, StatusCode::Unknown);
        assert!(outcome.error.is_some());
        assert!(outcome.page.is_none());
    }
}
