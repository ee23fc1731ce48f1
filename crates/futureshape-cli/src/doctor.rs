//! Environment readiness check.

use futureshape::config::{resolve_region_data_path, resolve_sources_path};
use futureshape::fetch::chromium::find_chromium;
use futureshape::{RegionIndex, SourceTable};

/// Check Chromium, the region gazetteer and the source table.
pub fn run(regions: Option<&str>, sources: Option<&str>) {
    println!("Futureshape Doctor");
    println!("==================");
    println!();

    let chromium = find_chromium();
    match &chromium {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Set FUTURESHAPE_CHROMIUM_PATH; university search will be unavailable."
        ),
    }

    let region_path = resolve_region_data_path(regions);
    let regions_ok = match RegionIndex::load(&region_path) {
        Ok(index) => {
            println!("[OK] Region data: {region_path} ({} rows)", index.len());
            true
        }
        Err(e) => {
            println!("[!!] Region data: {e}");
            false
        }
    };

    match resolve_sources_path(sources) {
        Some(path) => match SourceTable::load(&path) {
            Ok(table) => println!("[OK] Source table: {path} ({} endpoints)", table.len()),
            Err(e) => println!("[!!] Source table: {e}"),
        },
        None => println!(
            "[OK] Source table: built-in ({} endpoints)",
            SourceTable::builtin().len()
        ),
    }

    println!();
    if regions_ok && chromium.is_some() {
        println!("Status: READY");
    } else if regions_ok {
        println!("Status: READY (HTTP-only)");
    } else {
        println!("Status: NOT READY");
    }
}
