//! Page fetching with bounded retries
//!
//! All network traffic goes through [`Fetcher`]: product pages, category
//! pages, and image downloads share one client with browser-like headers
//! (the stand-in for the original's fingerprint-spoofing HTTP client).
//! Failures never escape as errors; they degrade to [`FetchOutcome`]
//! variants the callers fold into per-URL accounting.

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Desktop Chrome user agent presented to the target host
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// 200 response; the page body
    Success(String),

    /// 404 response; a permanent miss, never retried
    NotFound,

    /// Retries exhausted on transport errors or non-200/404 statuses
    Failed,
}

impl FetchOutcome {
    /// Returns the page body for a successful fetch
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchOutcome::Success(body) => Some(body),
            _ => None,
        }
    }
}

/// Builds the shared HTTP client with browser-like headers
pub fn build_http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-GB,en;q=0.9"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sleeps for a random duration within the given millisecond range
pub async fn random_delay(range: [u64; 2]) {
    let millis = if range[0] >= range[1] {
        range[0]
    } else {
        rand::thread_rng().gen_range(range[0]..=range[1])
    };
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

/// Retrying page fetcher shared by the crawler, the batch runner, and
/// the image downloader
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retries: u32,
    retry_delay_ms: [u64; 2],
}

impl Fetcher {
    /// Creates a fetcher from scraper configuration
    pub fn new(config: &crate::config::ScraperConfig) -> Result<Self, reqwest::Error> {
        Ok(Fetcher {
            client: build_http_client(config.fetch_timeout_secs)?,
            retries: config.fetch_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Fetches a page, retrying transient failures
    ///
    /// Retry policy:
    /// - 200: return the body
    /// - 404: return [`FetchOutcome::NotFound`] immediately
    /// - any other status or transport error: randomized delay, retry
    ///
    /// Exhausting the attempt budget yields [`FetchOutcome::Failed`].
    pub async fn fetch_page(&self, url: &str) -> FetchOutcome {
        for attempt in 1..=self.retries {
            match self.client.get(url).send().await {
                Ok(response) => match response.status() {
                    StatusCode::OK => match response.text().await {
                        Ok(body) => return FetchOutcome::Success(body),
                        Err(e) => {
                            tracing::debug!("Body read failed for {} (attempt {}): {}", url, attempt, e);
                        }
                    },
                    StatusCode::NOT_FOUND => {
                        tracing::debug!("404 for {}", url);
                        return FetchOutcome::NotFound;
                    }
                    status => {
                        tracing::debug!("HTTP {} for {} (attempt {})", status, url, attempt);
                    }
                },
                Err(e) => {
                    tracing::debug!("Request error for {} (attempt {}): {}", url, attempt, e);
                }
            }

            random_delay(self.retry_delay_ms).await;
        }

        tracing::warn!("Giving up on {} after {} attempts", url, self.retries);
        FetchOutcome::Failed
    }

    /// Fetches raw bytes (image downloads); a single attempt, no retry
    pub async fn fetch_bytes(&self, url: &str) -> Option<Vec<u8>> {
        let response = self.client.get(url).send().await.ok()?;
        if response.status() != StatusCode::OK {
            return None;
        }
        response.bytes().await.ok().map(|b| b.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_fetcher() -> Fetcher {
        let mut config = ScraperConfig::default();
        config.retry_delay_ms = [0, 1];
        Fetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let outcome = fast_fetcher()
            .fetch_page(&format!("{}/page", server.uri()))
            .await;
        assert_eq!(outcome.into_body().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_fetch_404_is_immediate_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = fast_fetcher()
            .fetch_page(&format!("{}/gone", server.uri()))
            .await;
        assert!(matches!(outcome, FetchOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_fetch_retries_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let outcome = fast_fetcher()
            .fetch_page(&format!("{}/flaky", server.uri()))
            .await;
        assert!(matches!(outcome, FetchOutcome::Failed));
    }

    #[tokio::test]
    async fn test_fetch_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/img.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
            .mount(&server)
            .await;

        let fetcher = fast_fetcher();
        let bytes = fetcher
            .fetch_bytes(&format!("{}/img.jpg", server.uri()))
            .await;
        assert_eq!(bytes, Some(vec![0xFF, 0xD8, 0xFF]));

        let missing = fetcher
            .fetch_bytes(&format!("{}/missing.jpg", server.uri()))
            .await;
        assert_eq!(missing, None);
    }
}
