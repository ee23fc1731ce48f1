//! `futureshape majors`: flatten a College Board listing.

use anyhow::{Context, Result};
use futureshape::MajorCatalog;
use std::time::Instant;
use tracing::info;

pub fn run(input: &str, output: &str) -> Result<()> {
    let start = Instant::now();
    info!("loading major listing from {input}");
    let catalog = MajorCatalog::load(input)?;
    info!(
        "parsed {} majors in {:.3}ms",
        catalog.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let json = serde_json::to_string(&catalog)?;
    std::fs::write(output, json).with_context(|| format!("cannot write {output}"))?;
    info!("catalog written to {output}");
    Ok(())
}
