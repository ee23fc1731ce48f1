// Copyright 2026 Futureshape Contributors
// SPDX-License-Identifier: Apache-2.0

//! `futureshape search`: build a query, aggregate, print the report.

use anyhow::{Context, Result};
use futureshape::config::{resolve_region_data_path, resolve_sources_path};
use futureshape::fetch::chromium::ChromiumRenderer;
use futureshape::fetch::renderer::{NoopRenderer, Renderer};
use futureshape::progress::{self, ProgressReceiver};
use futureshape::{Aggregator, EngineConfig, Query, RegionIndex, SourceTable, WebGateway};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

pub struct SearchArgs {
    pub target: Option<String>,
    pub current: Option<String>,
    pub major: Option<String>,
    pub equality: bool,
    pub progress: bool,
}

pub async fn run(regions: Option<&str>, sources: Option<&str>, args: SearchArgs) -> Result<()> {
    let region_path = resolve_region_data_path(regions);
    let index = RegionIndex::load(&region_path)
        .with_context(|| format!("cannot load region data from {region_path}"))?;
    info!("loaded {} regions from {region_path}", index.len());

    let table = match resolve_sources_path(sources) {
        Some(path) => SourceTable::load(&path)?,
        None => SourceTable::builtin(),
    };

    let query = Query::build(
        &index,
        args.target.as_deref(),
        args.current.as_deref(),
        args.major.as_deref(),
        Some(args.equality),
    );

    let config = EngineConfig::from_env();
    let renderer: Arc<dyn Renderer> = match ChromiumRenderer::launch().await {
        Ok(r) => Arc::new(r),
        Err(e) => {
            warn!("{e:#}; rendered sources will be unavailable");
            Arc::new(NoopRenderer)
        }
    };
    let gateway = Arc::new(WebGateway::new(&config, Arc::clone(&renderer)));

    let mut aggregator = Aggregator::new(gateway, Arc::new(table)).with_config(config);

    let printer = if args.progress {
        let (tx, rx) = progress::channel();
        aggregator = aggregator.with_progress(tx);
        Some(tokio::spawn(async move {
            forward_progress(rx, &mut std::io::stderr()).await
        }))
    } else {
        None
    };

    let report = aggregator.run(&query).await;

    // Dropping the aggregator closes the progress channel.
    drop(aggregator);
    if let Some(handle) = printer {
        let _ = handle.await;
    }
    if let Err(e) = renderer.shutdown().await {
        warn!("renderer shutdown failed: {e:#}");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Write each progress event as one JSON line until the channel closes.
/// Falling behind drops the missed events and keeps going.
async fn forward_progress(mut rx: ProgressReceiver, out: &mut impl Write) -> usize {
    let mut written = 0;
    loop {
        match rx.recv().await {
            Ok(event) => {
                let Ok(line) = serde_json::to_string(&event) else {
                    continue;
                };
                if writeln!(out, "{line}").is_ok() {
                    written += 1;
                }
            }
            Err(RecvError::Lagged(missed)) => {
                warn!("progress printer fell behind, {missed} events dropped");
            }
            Err(RecvError::Closed) => return written,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futureshape::progress::{ProgressEmitter, ProgressEventKind};
    use futureshape::Category;

    #[tokio::test]
    async fn test_forwarding_survives_lag() {
        let (tx, rx) = progress::channel();
        let emitter = ProgressEmitter::new(Some(tx), "req");
        for _ in 0..300 {
            emitter.emit(ProgressEventKind::CollectorStarted {
                category: Category::Scholarships,
            });
        }
        drop(emitter);

        let mut out = Vec::new();
        let written = forward_progress(rx, &mut out).await;
        assert_eq!(written, 256);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 256);
        let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
        assert_eq!(last["seq"], 300);
    }
}
