//! BigFuture college search results.
//!
//! The results list is built client-side, so this adapter only ever sees
//! rendered HTML. Cards are addressed through their `data-testid` hooks,
//! which are stable across the site's styling changes.

use super::{absolute_url, extract_entries, field_attr, field_text, SourceAdapter};
use crate::sanitize::{RecordPayload, SanitizeError};
use crate::types::{ExtractedRecord, SourceId, University};

const SITE_ROOT: &str = "https://bigfuture.collegeboard.org";

const CONTAINER: &str = r#"[data-testid="cs-search-results-list"]"#;
const ENTRY: &str = r#"[data-testid="cs-college-card-container"]"#;

const NAME_LINK: &str = r#"a[data-testid="cs-college-card-college-name-link"]"#;
const LOCATION: &str = r#"[data-testid="cs-college-card-details-profile-school-location"]"#;
const OVERVIEW: &str = r#"[data-testid="cs-college-card-details-profile-school-type"]"#;
const GRADUATION_RATE: &str = r#"[data-testid="cs-college-card-details-profile-school-graduation-rate"]"#;
const AVERAGE_COST: &str = r#"[data-testid="cs-college-card-details-profile-school-average-cost"]"#;
const SAT_RANGE: &str = r#"[data-testid="cs-college-card-details-testing-sat-range"]"#;

pub struct CollegeBoard;

impl SourceAdapter for CollegeBoard {
    fn source(&self) -> SourceId {
        SourceId::Collegeboard
    }

    fn extract(&self, body: &str) -> Result<Vec<ExtractedRecord>, SanitizeError> {
        extract_entries(body, CONTAINER, Some(ENTRY), |card| {
            let university: University = RecordPayload::new()
                .field("url", &absolute_url(SITE_ROOT, &field_attr(card, NAME_LINK, "href")))
                .field("name", &field_text(card, NAME_LINK))
                .field("location", &field_text(card, LOCATION))
                .field("overview", &field_text(card, OVERVIEW))
                .field("graduation_rate", &field_text(card, GRADUATION_RATE))
                .field("average_tuition", &field_text(card, AVERAGE_COST))
                .field("sat_range", &field_text(card, SAT_RANGE))
                .decode()?;
            Ok(Some(ExtractedRecord::University(university)))
        })
    }
}
