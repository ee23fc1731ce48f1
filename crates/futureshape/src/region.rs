//! Region gazetteer and free-text region lookup.
//!
//! The gazetteer is a comma-delimited file with a header row. Columns used
//! (0-indexed): 1 = country, 2 = state name, 3 = state abbreviation,
//! 4 = city name. It is loaded once and shared read-only afterwards.

use crate::types::{EngineError, EngineResult, RegionRecord};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const COL_COUNTRY: usize = 1;
const COL_STATE_NAME: usize = 2;
const COL_STATE_ABBREV: usize = 3;
const COL_CITY_NAME: usize = 4;

/// A stored row plus the lower-cased keys it is matched on.
#[derive(Debug, Clone)]
struct IndexedRegion {
    record: RegionRecord,
    state_key: String,
    city_key: String,
}

/// Immutable, file-ordered gazetteer of region records.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    regions: Vec<IndexedRegion>,
}

impl RegionIndex {
    /// Load the gazetteer from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EngineError::RegionData(format!(
                "region data file not found: {}",
                path.display()
            )));
        }
        let file = std::fs::File::open(path)?;
        let index = Self::from_reader(file)?;
        info!("loaded {} regions from {}", index.len(), path.display());
        Ok(index)
    }

    /// Parse gazetteer rows from any reader. The first row is a header.
    pub fn from_reader<R: Read>(reader: R) -> EngineResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut regions = Vec::new();
        for (line, row) in rdr.records().enumerate() {
            let row = row?;
            if row.len() <= COL_CITY_NAME {
                debug!("skipping short gazetteer row {} ({} columns)", line + 2, row.len());
                continue;
            }
            let field = |i: usize| row.get(i).unwrap_or_default().trim().to_string();
            let country = field(COL_COUNTRY);
            let record = RegionRecord {
                country: (!country.is_empty()).then_some(country),
                state_name: field(COL_STATE_NAME),
                state_abbrev: field(COL_STATE_ABBREV),
                city_name: field(COL_CITY_NAME),
            };
            regions.push(IndexedRegion {
                state_key: record.state_name.to_lowercase(),
                city_key: record.city_name.to_lowercase(),
                record,
            });
        }

        Ok(Self { regions })
    }

    /// Build an index directly from records, keeping their order.
    pub fn from_records(records: impl IntoIterator<Item = RegionRecord>) -> Self {
        let regions = records
            .into_iter()
            .map(|record| IndexedRegion {
                state_key: record.state_name.to_lowercase(),
                city_key: record.city_name.to_lowercase(),
                record,
            })
            .collect();
        Self { regions }
    }

    /// Resolve free text ("Miami, Florida", "ohio") to the first matching
    /// record in file order.
    ///
    /// The input is trimmed and lower-cased, then split on whitespace and
    /// commas; the last piece is the search key. A record matches when its
    /// lower-cased state or city name starts with or contains the key.
    pub fn resolve(&self, text: &str) -> Option<&RegionRecord> {
        let cleaned = text.trim().to_lowercase();
        if cleaned.is_empty() {
            return None;
        }

        let key = cleaned
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|piece| !piece.is_empty())
            .last()?;

        self.regions
            .iter()
            .find(|r| {
                r.state_key.starts_with(key)
                    || r.city_key.starts_with(key)
                    || r.state_key.contains(key)
                    || r.city_key.contains(key)
            })
            .map(|r| &r.record)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionRecord> {
        self.regions.iter().map(|r| &r.record)
    }
}
