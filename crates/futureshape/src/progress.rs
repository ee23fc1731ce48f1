// Copyright 2026 Futureshape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Progress events and broadcast channel for live aggregation status.
//!
//! Collectors emit `ProgressEvent`s while they fetch, which flow through a
//! `tokio::sync::broadcast` channel to all subscribers (a status page, the
//! CLI's `--progress` printer). When no subscriber exists, events are
//! silently dropped.

use crate::types::{Category, Role, SourceId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A progress event emitted during one aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// The aggregation this event belongs to.
    pub request_id: String,
    /// Monotonically increasing sequence number within the aggregation.
    pub seq: u64,
    /// The kind of progress event.
    pub event: ProgressEventKind,
}

/// The specific kind of progress event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProgressEventKind {
    /// The orchestrator has started all collectors.
    AggregationStarted {
        target: Option<String>,
        current: Option<String>,
    },
    /// A collector began work.
    CollectorStarted { category: Category },
    /// A collector returned its skeleton without fetching.
    CollectorSkipped { category: Category, reason: String },
    /// One source page was fetched and extracted.
    SourceFetched {
        category: Category,
        role: Role,
        source: SourceId,
        page: Option<u32>,
        records: usize,
    },
    /// One source page could not be fetched.
    SourceUnavailable {
        category: Category,
        role: Role,
        source: SourceId,
        page: Option<u32>,
    },
    /// A collector finished; its section is final.
    CollectorCompleted { category: Category, duration_ms: u64 },
    /// Every collector finished and the report is assembled.
    AggregationComplete { elapsed_ms: u64 },
}

/// Sender handle for emitting progress events.
pub type ProgressSender = tokio::sync::broadcast::Sender<ProgressEvent>;

/// Receiver handle for consuming progress events.
pub type ProgressReceiver = tokio::sync::broadcast::Receiver<ProgressEvent>;

/// Create a new progress broadcast channel with a bounded buffer.
///
/// 256 events covers a full aggregation (four collectors, two roles, up to
/// ten org pages each) with room to spare.
pub fn channel() -> (ProgressSender, ProgressReceiver) {
    tokio::sync::broadcast::channel(256)
}

/// Per-aggregation emitter shared by the concurrently running collectors.
pub struct ProgressEmitter {
    tx: Option<ProgressSender>,
    request_id: String,
    seq: AtomicU64,
}

impl ProgressEmitter {
    pub fn new(tx: Option<ProgressSender>, request_id: impl Into<String>) -> Self {
        Self {
            tx,
            request_id: request_id.into(),
            seq: AtomicU64::new(0),
        }
    }

    /// Emitter that drops everything.
    pub fn silent() -> Self {
        Self::new(None, String::new())
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Emit an event, ignoring send errors (no receivers listening).
    pub fn emit(&self, event: ProgressEventKind) {
        if let Some(ref sender) = self.tx {
            let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
            let _ = sender.send(ProgressEvent {
                request_id: self.request_id.clone(),
                seq,
                event,
            });
        }
    }
}
