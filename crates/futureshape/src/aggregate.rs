// Copyright 2026 Futureshape Contributors
// SPDX-License-Identifier: Apache-2.0

//! The aggregation orchestrator.
//!
//! All four collectors start together and the orchestrator waits for every
//! one of them. They run as futures on the caller's task, never on separate
//! threads, and each returns its own section, so no two of them write the
//! same part of the report.

use crate::adapters::AdapterRegistry;
use crate::collectors::{self, CollectContext};
use crate::config::{EngineConfig, SourceTable};
use crate::fetch::FetchGateway;
use crate::progress::{ProgressEmitter, ProgressEventKind, ProgressSender};
use crate::query::Query;
use crate::report::Report;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Runs a [`Query`] against every source and assembles the [`Report`].
pub struct Aggregator {
    gateway: Arc<dyn FetchGateway>,
    sources: Arc<SourceTable>,
    adapters: Arc<AdapterRegistry>,
    config: EngineConfig,
    progress: Option<ProgressSender>,
}

impl Aggregator {
    /// Aggregator with the standard adapters and default settings.
    pub fn new(gateway: Arc<dyn FetchGateway>, sources: Arc<SourceTable>) -> Self {
        Self {
            gateway,
            sources,
            adapters: Arc::new(AdapterRegistry::standard()),
            config: EngineConfig::default(),
            progress: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_adapters(mut self, adapters: Arc<AdapterRegistry>) -> Self {
        self.adapters = adapters;
        self
    }

    /// Publish progress events on `tx` for every run.
    pub fn with_progress(mut self, tx: ProgressSender) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Run every collector and merge their sections. Never fails: each
    /// unavailable source is a `null` leaf in the result.
    pub async fn run(&self, query: &Query) -> Report {
        let progress = ProgressEmitter::new(self.progress.clone(), uuid::Uuid::new_v4().to_string());
        let request_id = progress.request_id();
        let ctx = CollectContext {
            gateway: self.gateway.as_ref(),
            sources: &self.sources,
            adapters: &self.adapters,
            config: &self.config,
            progress: &progress,
        };

        let start = Instant::now();
        info!(
            "aggregation {request_id} started (target: {}, current: {})",
            describe(query.target_region.as_ref().map(|r| r.canonical_name())),
            describe(query.current_region.as_ref().map(|r| r.canonical_name())),
        );
        progress.emit(ProgressEventKind::AggregationStarted {
            target: query.target_region.as_ref().map(|r| r.canonical_name()),
            current: query.current_region.as_ref().map(|r| r.canonical_name()),
        });

        let (scholarships, universities, living_costs, queer_scoring) = tokio::join!(
            collectors::scholarships::collect(&ctx, query),
            collectors::universities::collect(&ctx, query),
            collectors::living_costs::collect(&ctx, query),
            collectors::equality::collect(&ctx, query),
        );

        let report = Report::builder()
            .scholarships(scholarships)
            .universities(universities)
            .living_costs(living_costs)
            .queer_scoring(queer_scoring)
            .build();

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!("aggregation {request_id} finished in {elapsed_ms}ms");
        progress.emit(ProgressEventKind::AggregationComplete { elapsed_ms });
        report
    }
}

fn describe(region: Option<String>) -> String {
    region.unwrap_or_else(|| "none".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::testing::{both_roles, CannedGateway};
    use crate::progress;

    #[tokio::test]
    async fn test_all_sources_down_yields_skeleton() {
        let aggregator = Aggregator::new(
            Arc::new(CannedGateway::default()),
            Arc::new(SourceTable::builtin()),
        );
        let mut query = both_roles();
        query.use_equality_scoring = false;

        let report = aggregator.run(&query).await;
        assert_eq!(report, Report::skeleton());
    }

    #[tokio::test]
    async fn test_unregistered_sources_are_never_fetched() {
        let gateway = Arc::new(CannedGateway::default());
        let aggregator = Aggregator::new(gateway.clone(), Arc::new(SourceTable::builtin()))
            .with_adapters(Arc::new(AdapterRegistry::new()));

        let report = aggregator.run(&both_roles()).await;
        assert_eq!(report, Report::skeleton());
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_progress_brackets_the_run() {
        let (tx, mut rx) = progress::channel();
        let aggregator = Aggregator::new(
            Arc::new(CannedGateway::default()),
            Arc::new(SourceTable::builtin()),
        )
        .with_progress(tx);

        aggregator.run(&Query::default()).await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(matches!(
            events.first().map(|e| &e.event),
            Some(ProgressEventKind::AggregationStarted { target: None, current: None })
        ));
        assert!(matches!(
            events.last().map(|e| &e.event),
            Some(ProgressEventKind::AggregationComplete { .. })
        ));
        let seqs: Vec<u64> = events.iter().map(|e| e.seq).collect();
        assert!(seqs.windows(2).all(|w| w[1] == w[0] + 1));
        assert!(events.iter().all(|e| e.request_id == events[0].request_id));
    }
}
