//! Async HTTP client wrapping reqwest.
//!
//! Not a browser: just one GET per call with a fixed Chrome user agent.
//! No retries: a failed request is reported once and the caller decides.

use super::FetchError;
use std::time::Duration;

/// Browser-like user agent sent with every plain request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/131.0.0.0 Safari/537.36";

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Original requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Stateless HTTP client for fast fetches.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with the standard Chrome user agent.
    pub fn new(timeout_ms: u64) -> Self {
        let timeout = Duration::from_millis(timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self { client, timeout }
    }

    /// Perform a single GET. Non-success statuses are errors.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let resp = self.client.get(url).timeout(self.timeout).send().await?;

        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = resp.text().await?;

        Ok(HttpResponse {
            url: url.to_string(),
            final_url,
            status,
            body,
        })
    }
}
