// Copyright 2026 Futureshape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Outbound retrieval in two modes.
//!
//! A fast fetch is one stateless GET whose failures collapse to `None`. A
//! rendered fetch drives a headless browser tab until the network settles,
//! retrying with exponential backoff under a hard deadline.

pub mod chromium;
pub mod http_client;
pub mod renderer;

use crate::config::{EngineConfig, RenderPolicy};
use crate::types::FetchMode;
use anyhow::anyhow;
use async_trait::async_trait;
use http_client::HttpClient;
use renderer::{NoopRenderer, RenderContext, Renderer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Script returning how many network resources the page has loaded so far.
const RESOURCE_COUNT_JS: &str = "performance.getEntriesByType('resource').length";

/// Poll interval while waiting for the network to go idle.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Upper bound on closing a render context.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from a single fetch.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("render of {url} failed after {attempts} attempts: {last}")]
    RenderExhausted {
        url: String,
        attempts: u32,
        last: String,
    },

    #[error("render of {url} exceeded its {after:?} deadline")]
    RenderTimeout { url: String, after: Duration },
}

/// Outbound retrieval seam used by every collector.
#[async_trait]
pub trait FetchGateway: Send + Sync {
    /// One stateless GET. Any transport failure or non-success status is
    /// `None`.
    async fn fast_fetch(&self, url: &str) -> Option<String>;

    /// Full browser render of `url`, serialized to HTML.
    async fn rendered_fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch in the given mode, collapsing every failure to `None`.
    async fn fetch(&self, mode: FetchMode, url: &str) -> Option<String> {
        match mode {
            FetchMode::Fast => self.fast_fetch(url).await,
            FetchMode::Rendered => match self.rendered_fetch(url).await {
                Ok(html) => Some(html),
                Err(e) => {
                    warn!("{e}");
                    None
                }
            },
        }
    }
}

/// Gateway backed by reqwest and a browser renderer.
pub struct WebGateway {
    http: HttpClient,
    renderer: Arc<dyn Renderer>,
    policy: RenderPolicy,
}

impl WebGateway {
    pub fn new(config: &EngineConfig, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            http: HttpClient::new(config.http_timeout_ms),
            renderer,
            policy: config.render.clone(),
        }
    }

    /// Gateway without a browser. Rendered fetches always fail.
    pub fn http_only(config: &EngineConfig) -> Self {
        Self::new(config, Arc::new(NoopRenderer))
    }

    /// One attempt bounded by `limit`: open a context, render, serialize,
    /// and always close. The close runs outside `limit`.
    async fn render_once(&self, url: &str, limit: Duration) -> anyhow::Result<String> {
        let mut ctx = tokio::time::timeout(limit, self.renderer.new_context())
            .await
            .map_err(|_| anyhow!("opening a render context timed out"))??;
        let limit_ms = limit.as_millis() as u64;
        let idle_window = self.policy.idle_window;

        let outcome = tokio::time::timeout(limit, async {
            ctx.navigate(url, limit_ms).await?;
            wait_for_network_idle(ctx.as_ref(), idle_window).await;
            ctx.get_html().await
        })
        .await;

        match tokio::time::timeout(CLOSE_TIMEOUT, ctx.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("closing render context for {url} failed: {e:#}"),
            Err(_) => warn!("closing render context for {url} timed out"),
        }

        match outcome {
            Ok(result) => result,
            Err(_) => Err(anyhow!("render attempt timed out after {limit_ms}ms")),
        }
    }
}

#[async_trait]
impl FetchGateway for WebGateway {
    async fn fast_fetch(&self, url: &str) -> Option<String> {
        if let Err(e) = url::Url::parse(url) {
            let err = FetchError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            };
            warn!("{err}");
            return None;
        }

        match self.http.get(url).await {
            Ok(resp) => {
                debug!(
                    "fetched {} ({} bytes, status {})",
                    resp.final_url,
                    resp.body.len(),
                    resp.status
                );
                Some(resp.body)
            }
            Err(e) => {
                debug!("fast fetch of {url} unavailable: {e}");
                None
            }
        }
    }

    async fn rendered_fetch(&self, url: &str) -> Result<String, FetchError> {
        let policy = &self.policy;
        let start = Instant::now();
        let timed_out = || FetchError::RenderTimeout {
            url: url.to_string(),
            after: policy.deadline,
        };

        let mut last = String::new();
        for attempt in 1..=policy.max_attempts {
            let remaining = policy.deadline.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                return Err(timed_out());
            }
            match self.render_once(url, remaining.min(policy.attempt_timeout)).await {
                Ok(html) => {
                    debug!(
                        "rendered {url} on attempt {attempt} in {:.1}s",
                        start.elapsed().as_secs_f64()
                    );
                    return Ok(html);
                }
                Err(e) => {
                    warn!("render attempt {attempt}/{} for {url} failed: {e:#}", policy.max_attempts);
                    last = format!("{e:#}");
                    if attempt < policy.max_attempts {
                        let remaining = policy.deadline.saturating_sub(start.elapsed());
                        tokio::time::sleep(policy.delay_for(attempt).min(remaining)).await;
                    }
                }
            }
        }

        if start.elapsed() >= policy.deadline {
            return Err(timed_out());
        }
        Err(FetchError::RenderExhausted {
            url: url.to_string(),
            attempts: policy.max_attempts,
            last,
        })
    }
}

/// Wait until the page's loaded-resource count stays unchanged for
/// `window`. Returns early if the count cannot be read.
async fn wait_for_network_idle(ctx: &dyn RenderContext, window: Duration) {
    let mut last: Option<u64> = None;
    let mut stable_since = Instant::now();
    loop {
        let count = match ctx.execute_js(RESOURCE_COUNT_JS).await {
            Ok(value) => value.as_u64(),
            Err(e) => {
                debug!("cannot observe network activity: {e:#}");
                return;
            }
        };
        if count.is_none() {
            return;
        }
        if count != last {
            last = count;
            stable_since = Instant::now();
        } else if stable_since.elapsed() >= window {
            return;
        }
        tokio::time::sleep(IDLE_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::renderer::NavigationResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Renderer whose first `fail_first` contexts fail to navigate.
    struct FlakyRenderer {
        fail_first: usize,
        opened: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
        hang: bool,
    }

    impl FlakyRenderer {
        fn new(fail_first: usize) -> Self {
            Self {
                fail_first,
                opened: Arc::new(AtomicUsize::new(0)),
                closed: Arc::new(AtomicUsize::new(0)),
                hang: false,
            }
        }
    }

    struct FlakyContext {
        fail: bool,
        hang: bool,
        closed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Renderer for FlakyRenderer {
        async fn new_context(&self) -> anyhow::Result<Box<dyn RenderContext>> {
            let n = self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FlakyContext {
                fail: n < self.fail_first,
                hang: self.hang,
                closed: Arc::clone(&self.closed),
            }))
        }
        async fn shutdown(&self) -> anyhow::Result<()> {
            Ok(())
        }
        fn active_contexts(&self) -> usize {
            self.opened.load(Ordering::SeqCst) - self.closed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RenderContext for FlakyContext {
        async fn navigate(&mut self, url: &str, _timeout_ms: u64) -> anyhow::Result<NavigationResult> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail {
                anyhow::bail!("net::ERR_CONNECTION_RESET");
            }
            Ok(NavigationResult {
                final_url: url.to_string(),
                load_time_ms: 1,
            })
        }
        async fn execute_js(&self, _script: &str) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::json!(3))
        }
        async fn get_html(&self) -> anyhow::Result<String> {
            Ok("<html><body>rendered</body></html>".to_string())
        }
        async fn close(self: Box<Self>) -> anyhow::Result<()> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn fast_config() -> EngineConfig {
        EngineConfig {
            http_timeout_ms: 2000,
            render: RenderPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(1),
                backoff_multiplier: 2.0,
                max_delay: Duration::from_millis(4),
                attempt_timeout: Duration::from_millis(500),
                deadline: Duration::from_secs(5),
                idle_window: Duration::from_millis(1),
            },
            org_page_limit: 10,
        }
    }

    #[tokio::test]
    async fn test_rendered_fetch_retries_then_succeeds() {
        let renderer = Arc::new(FlakyRenderer::new(2));
        let gateway = WebGateway::new(&fast_config(), renderer.clone());
        let html = gateway.rendered_fetch("https://example.com").await.unwrap();
        assert!(html.contains("rendered"));
        assert_eq!(renderer.opened.load(Ordering::SeqCst), 3);
        assert_eq!(renderer.active_contexts(), 0);
    }

    #[tokio::test]
    async fn test_rendered_fetch_is_bounded() {
        let renderer = Arc::new(FlakyRenderer::new(usize::MAX));
        let gateway = WebGateway::new(&fast_config(), renderer.clone());
        let err = gateway.rendered_fetch("https://example.com").await.unwrap_err();
        assert!(matches!(err, FetchError::RenderExhausted { attempts: 3, .. }));
        // Every failed attempt released its context.
        assert_eq!(renderer.closed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_rendered_fetch_deadline() {
        let mut renderer = FlakyRenderer::new(0);
        renderer.hang = true;
        let renderer = Arc::new(renderer);
        let mut config = fast_config();
        config.render.attempt_timeout = Duration::from_secs(10);
        config.render.deadline = Duration::from_millis(50);
        let gateway = WebGateway::new(&config, renderer.clone());
        let err = gateway.rendered_fetch("https://example.com").await.unwrap_err();
        assert!(matches!(err, FetchError::RenderTimeout { .. }));
        // The attempt cut short by the deadline still closed its context.
        assert_eq!(renderer.opened.load(Ordering::SeqCst), 1);
        assert_eq!(renderer.closed.load(Ordering::SeqCst), 1);
        assert_eq!(renderer.active_contexts(), 0);
    }

    #[tokio::test]
    async fn test_deadline_spanning_attempts_closes_each_context() {
        let mut renderer = FlakyRenderer::new(0);
        renderer.hang = true;
        let renderer = Arc::new(renderer);
        let mut config = fast_config();
        config.render.max_attempts = 5;
        config.render.attempt_timeout = Duration::from_millis(30);
        config.render.deadline = Duration::from_millis(75);
        let gateway = WebGateway::new(&config, renderer.clone());
        let err = gateway.rendered_fetch("https://example.com").await.unwrap_err();
        assert!(matches!(err, FetchError::RenderTimeout { .. }));
        let opened = renderer.opened.load(Ordering::SeqCst);
        assert!((1..=3).contains(&opened), "opened {opened} contexts");
        assert_eq!(renderer.closed.load(Ordering::SeqCst), opened);
    }

    #[tokio::test]
    async fn test_attempt_timeout_still_closes_context() {
        let mut renderer = FlakyRenderer::new(0);
        renderer.hang = true;
        let renderer = Arc::new(renderer);
        let mut config = fast_config();
        config.render.max_attempts = 2;
        config.render.attempt_timeout = Duration::from_millis(20);
        let gateway = WebGateway::new(&config, renderer.clone());
        let err = gateway.rendered_fetch("https://example.com").await.unwrap_err();
        assert!(matches!(err, FetchError::RenderExhausted { attempts: 2, .. }));
        assert_eq!(renderer.closed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_noop_renderer_collapses_to_none() {
        let gateway = WebGateway::http_only(&fast_config());
        assert!(gateway
            .fetch(FetchMode::Rendered, "https://example.com")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_fast_fetch_failures_are_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let gateway = WebGateway::http_only(&fast_config());
        assert_eq!(
            gateway.fast_fetch(&format!("{}/ok", server.uri())).await.as_deref(),
            Some("body")
        );
        assert!(gateway.fast_fetch(&format!("{}/gone", server.uri())).await.is_none());
        assert!(gateway.fast_fetch("not a url").await.is_none());
        // Nothing listens on port 1.
        assert!(gateway.fast_fetch("http://127.0.0.1:1/").await.is_none());
    }
}
