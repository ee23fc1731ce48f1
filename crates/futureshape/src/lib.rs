// Copyright 2026 Futureshape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Futureshape: comparison engine for students weighing where to study.
//!
//! Given a [`Query`] (target region, current region, field of study and an
//! equality-scoring flag) the engine fans out to scholarship listings,
//! university listings, cost-of-living comparisons and a state equality
//! profile, and folds the results into one [`Report`].

pub mod adapters;
pub mod aggregate;
pub mod collectors;
pub mod config;
pub mod fetch;
pub mod majors;
pub mod progress;
pub mod query;
pub mod region;
pub mod report;
pub mod sanitize;
pub mod types;

pub use adapters::{AdapterRegistry, SourceAdapter};
pub use aggregate::Aggregator;
pub use config::{EngineConfig, SourceTable};
pub use fetch::{FetchGateway, WebGateway};
pub use majors::MajorCatalog;
pub use query::Query;
pub use region::RegionIndex;
pub use report::Report;
pub use types::*;
