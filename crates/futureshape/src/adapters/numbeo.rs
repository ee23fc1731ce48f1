//! Numbeo city-to-city cost of living comparison table.
//!
//! Columns are: item, price in the current city, price in the target city,
//! and the relative difference.

use super::{extract_entries, field_text, selector, SourceAdapter};
use crate::sanitize::{RecordPayload, SanitizeError};
use crate::types::{CostEntry, ExtractedRecord, SourceId};

const CONTAINER: &str = "table.data_wide_table";
const ENTRY: &str = "tr";

const ITEM: &str = "td:nth-of-type(1)";
const CURRENT: &str = "td:nth-of-type(2)";
const TARGET: &str = "td:nth-of-type(3)";
const DIFFERENCE: &str = "td:nth-of-type(4)";

pub struct Numbeo;

impl SourceAdapter for Numbeo {
    fn source(&self) -> SourceId {
        SourceId::Numbeo
    }

    fn extract(&self, body: &str) -> Result<Vec<ExtractedRecord>, SanitizeError> {
        let cell = selector("td");
        extract_entries(body, CONTAINER, Some(ENTRY), |row| {
            // Section headings are <th>-only rows.
            if row.select(&cell).next().is_none() {
                return Ok(None);
            }
            let entry: CostEntry = RecordPayload::new()
                .field("entry_name", &field_text(row, ITEM))
                .field("current_cost", &field_text(row, CURRENT))
                .field("target_cost", &field_text(row, TARGET))
                .field("difference", &field_text(row, DIFFERENCE))
                .decode()?;
            Ok(Some(ExtractedRecord::Cost(entry)))
        })
    }
}
