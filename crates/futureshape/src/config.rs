//! Configuration loading and resolution.
//!
//! The source table (URL templates keyed by category and source) is embedded
//! at compile time from `sources.json` and can be replaced by a file with
//! the same shape. It is built once and injected into the aggregator.

use crate::types::{Category, EngineError, EngineResult, FetchMode, SourceId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Raw JSON content of the built-in source table.
const SOURCES_JSON: &str = include_str!("sources.json");

// ── URL templates ──

/// A URL containing `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute each `{name}` with its percent-encoded value. Placeholders
    /// without a value are left as-is.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut url = self.0.clone();
        for (name, value) in vars {
            let placeholder = format!("{{{name}}}");
            url = url.replace(&placeholder, &urlencoding::encode(value));
        }
        if url.contains('{') {
            debug!("template left unfilled placeholders: {url}");
        }
        url
    }
}

/// Where and how to retrieve one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEndpoint {
    pub url: UrlTemplate,
    #[serde(default)]
    pub mode: FetchMode,
}

/// Immutable table of source endpoints keyed by `(category, source)`.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    endpoints: HashMap<(Category, SourceId), SourceEndpoint>,
}

impl SourceTable {
    /// The table shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_json(SOURCES_JSON).unwrap_or_default()
    }

    /// Parse a `{category: {source: {url, mode}}}` document.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let nested: HashMap<Category, HashMap<SourceId, SourceEndpoint>> =
            serde_json::from_str(json)?;
        let endpoints = nested
            .into_iter()
            .flat_map(|(category, sources)| {
                sources
                    .into_iter()
                    .map(move |(source, endpoint)| ((category, source), endpoint))
            })
            .collect();
        Ok(Self { endpoints })
    }

    /// Load a source table file.
    pub fn load(path: &str) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("cannot read sources file {path}: {e}")))?;
        Self::from_json(&json)
    }

    /// Return a copy with one endpoint added or replaced.
    pub fn with_endpoint(
        mut self,
        category: Category,
        source: SourceId,
        url: impl Into<String>,
        mode: FetchMode,
    ) -> Self {
        self.endpoints.insert(
            (category, source),
            SourceEndpoint {
                url: UrlTemplate::new(url),
                mode,
            },
        );
        self
    }

    pub fn endpoint(&self, category: Category, source: SourceId) -> Option<&SourceEndpoint> {
        self.endpoints.get(&(category, source))
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

// ── Engine settings ──

/// Retry and timeout policy for rendered fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPolicy {
    /// Maximum number of render attempts.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Multiplier applied per further failure.
    pub backoff_multiplier: f64,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Time allowed for one navigate-and-serialize attempt.
    pub attempt_timeout: Duration,
    /// Time allowed for the whole rendered fetch, retries included.
    pub deadline: Duration,
    /// How long the loaded-resource count must stay unchanged before the
    /// page counts as network-idle.
    pub idle_window: Duration,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(8),
            attempt_timeout: Duration::from_secs(45),
            deadline: Duration::from_secs(120),
            idle_window: Duration::from_millis(500),
        }
    }
}

impl RenderPolicy {
    /// Delay before retrying after the `attempt`-th failure (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.base_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        Duration::from_millis(millis as u64).min(self.max_delay)
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Timeout for a fast (plain HTTP) fetch.
    pub http_timeout_ms: u64,
    /// Rendered fetch policy.
    pub render: RenderPolicy,
    /// Number of pages walked on the paginated scholarship source.
    pub org_page_limit: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            http_timeout_ms: 30_000,
            render: RenderPolicy::default(),
            org_page_limit: 10,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `FUTURESHAPE_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = env_u64("FUTURESHAPE_HTTP_TIMEOUT_MS") {
            config.http_timeout_ms = ms;
        }
        if let Some(n) = env_u64("FUTURESHAPE_RENDER_ATTEMPTS") {
            config.render.max_attempts = n.max(1) as u32;
        }
        if let Some(ms) = env_u64("FUTURESHAPE_RENDER_TIMEOUT_MS") {
            config.render.attempt_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("FUTURESHAPE_RENDER_DEADLINE_MS") {
            config.render.deadline = Duration::from_millis(ms);
        }
        if let Some(n) = env_u64("FUTURESHAPE_ORG_PAGES") {
            config.org_page_limit = n as u32;
        }
        config
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

// ── Path resolution ──

/// Resolve the gazetteer path.
pub fn resolve_region_data_path(explicit: Option<&str>) -> String {
    if let Some(path) = explicit {
        return path.to_string();
    }

    if let Ok(env_path) = std::env::var("FUTURESHAPE_REGION_DATA") {
        return env_path;
    }

    let cwd_data = PathBuf::from("data/region_data.csv");
    if cwd_data.exists() {
        return cwd_data.display().to_string();
    }

    resolve_default_region_data_path()
}

fn resolve_default_region_data_path() -> String {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());

    format!("{home}/.futureshape/region_data.csv")
}

/// Resolve an optional source table override.
pub fn resolve_sources_path(explicit: Option<&str>) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var("FUTURESHAPE_SOURCES").ok())
}
