//! Category collectors.
//!
//! Each collector owns one report section. It fetches its sources for
//! each resolved role, runs the matching adapter, and absorbs every fetch
//! failure into a `None` leaf. A sanitization failure ends the sub-flow it
//! happened in and keeps whatever that sub-flow had already gathered.

pub mod equality;
pub mod living_costs;
pub mod scholarships;
pub mod universities;

use crate::adapters::AdapterRegistry;
use crate::config::{EngineConfig, SourceTable};
use crate::fetch::FetchGateway;
use crate::progress::{ProgressEmitter, ProgressEventKind};
use crate::sanitize::SanitizeError;
use crate::types::{Category, ExtractedRecord, Role, SourceId};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything a collector needs, borrowed from the aggregator for the
/// duration of one run.
pub struct CollectContext<'a> {
    pub gateway: &'a dyn FetchGateway,
    pub sources: &'a SourceTable,
    pub adapters: &'a AdapterRegistry,
    pub config: &'a EngineConfig,
    pub progress: &'a ProgressEmitter,
}

/// Outcome of one source fetch: `Ok(None)` when the source is unavailable.
pub type FetchOutcome = Result<Option<Vec<ExtractedRecord>>, SanitizeError>;

impl CollectContext<'_> {
    /// Fetch one page of `source` for `role` and extract its records.
    pub async fn fetch_records(
        &self,
        category: Category,
        source: SourceId,
        role: Role,
        page: Option<u32>,
        vars: &[(&str, &str)],
    ) -> FetchOutcome {
        let Some(endpoint) = self.sources.endpoint(category, source) else {
            warn!("no endpoint configured for {category}/{source}");
            return Ok(None);
        };
        let Some(adapter) = self.adapters.get(source) else {
            warn!("no adapter registered for {source}");
            return Ok(None);
        };

        let url = endpoint.url.render(vars);
        debug!("fetching {category}/{source} for {role} (page {page:?}): {url}");

        let Some(body) = self.gateway.fetch(endpoint.mode, &url).await else {
            warn!("{category}/{source} unavailable for {role} (page {page:?})");
            self.progress.emit(ProgressEventKind::SourceUnavailable {
                category,
                role,
                source,
                page,
            });
            return Ok(None);
        };

        let records = adapter.extract(&body)?;
        debug!(
            "{category}/{source} for {role} (page {page:?}) yielded {} records",
            records.len()
        );
        self.progress.emit(ProgressEventKind::SourceFetched {
            category,
            role,
            source,
            page,
            records: records.len(),
        });
        Ok(Some(records))
    }

    /// Run a collector body between started/completed events.
    pub async fn timed<F, T>(&self, category: Category, body: F) -> T
    where
        F: Future<Output = T>,
    {
        let start = Instant::now();
        info!("{category} collector started");
        self.progress
            .emit(ProgressEventKind::CollectorStarted { category });

        let section = body.await;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!("{category} collector finished in {duration_ms}ms");
        self.progress.emit(ProgressEventKind::CollectorCompleted {
            category,
            duration_ms,
        });
        section
    }

    /// Record that a collector returned its skeleton untouched.
    pub fn skipped(&self, category: Category, reason: &str) {
        info!("{category} collector skipped: {reason}");
        self.progress.emit(ProgressEventKind::CollectorSkipped {
            category,
            reason: reason.to_string(),
        });
    }
}

/// Collapse a single-shot outcome to its leaf, logging a sanitization
/// failure.
pub(crate) fn leaf<T>(
    outcome: FetchOutcome,
    category: Category,
    source: SourceId,
    role: Role,
    convert: fn(ExtractedRecord) -> Option<T>,
) -> Option<Vec<T>> {
    match outcome {
        Ok(records) => records.map(|r| typed(r, convert)),
        Err(e) => {
            warn!("{category}/{source} for {role} abandoned: {e}");
            None
        }
    }
}

/// Keep the records of the expected kind.
pub(crate) fn typed<T>(
    records: Vec<ExtractedRecord>,
    convert: fn(ExtractedRecord) -> Option<T>,
) -> Vec<T> {
    records.into_iter().filter_map(convert).collect()
}
