//! Scholarship America paginated listing.
//!
//! The listing renders server-side into a FacetWP template block. A page
//! past the end still carries the block but no cards, which the collector
//! reads as the end of pagination.

use super::{absolute_url, extract_entries, field_attr, field_text, SourceAdapter};
use crate::sanitize::{RecordPayload, SanitizeError};
use crate::types::{ExtractedRecord, Scholarship, SourceId};

const SITE_ROOT: &str = "https://scholarshipamerica.org";

const CONTAINER: &str = ".facetwp-template";
const ENTRY: &str = ".scholarship-card";

const LINK: &str = "a.scholarship-card__link";
const SPONSOR: &str = ".scholarship-card__sponsor";
const DESCRIPTION: &str = ".scholarship-card__description";
const AWARD_TYPE: &str = ".scholarship-card__type";
const AMOUNT: &str = ".scholarship-card__amount";
const DEADLINE: &str = ".scholarship-card__deadline";

pub struct ScholarshipAmerica;

impl SourceAdapter for ScholarshipAmerica {
    fn source(&self) -> SourceId {
        SourceId::Org
    }

    fn extract(&self, body: &str) -> Result<Vec<ExtractedRecord>, SanitizeError> {
        extract_entries(body, CONTAINER, Some(ENTRY), |card| {
            let scholarship: Scholarship = RecordPayload::new()
                .field("url", &absolute_url(SITE_ROOT, &field_attr(card, LINK, "href")))
                .field("organization_name", &field_text(card, SPONSOR))
                .field("organization_purpose", &field_text(card, DESCRIPTION))
                .field("award_type", &field_text(card, AWARD_TYPE))
                .field("award_amount", &field_text(card, AMOUNT))
                .field("submission_date", &field_text(card, DEADLINE))
                .decode()?;
            Ok(Some(ExtractedRecord::Scholarship(scholarship)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MISSING;

    fn card(name: &str, amount: &str) -> String {
        format!(
            r#"<article class="scholarship-card">
                 <a class="scholarship-card__link" href="/scholarship/{name}/">{name}</a>
                 <span class="scholarship-card__sponsor">{name} Foundation</span>
                 <p class="scholarship-card__description">Supports students in <em>STEM</em> fields</p>
                 <span class="scholarship-card__type">Scholarship</span>
                 <span class="scholarship-card__amount">{amount}</span>
               </article>"#
        )
    }

    #[test]
    fn test_extracts_every_card() {
        let page = format!(
            r#"<html><body><div class="facetwp-template">{}{}</div></body></html>"#,
            card("dream", "$1,000"),
            card("reach", "Varies")
        );
        let records = ScholarshipAmerica.extract(&page).unwrap();
        assert_eq!(records.len(), 2);

        let first = records[0].clone().into_scholarship().unwrap();
        assert_eq!(first.url, "https://scholarshipamerica.org/scholarship/dream/");
        assert_eq!(first.organization_name, "dream Foundation");
        assert_eq!(first.organization_purpose, "Supports students in STEM fields");
        assert_eq!(first.award_amount, "$1,000");
        assert_eq!(first.submission_date, MISSING);

        let second = records[1].clone().into_scholarship().unwrap();
        assert_eq!(second.award_amount, "Varies");
    }

    #[test]
    fn test_empty_template_yields_no_records() {
        let page = r#"<html><body><div class="facetwp-template"></div></body></html>"#;
        assert!(ScholarshipAmerica.extract(page).unwrap().is_empty());
    }

    #[test]
    fn test_unrepairable_card_is_an_error() {
        let page = format!(
            r#"<html><body><div class="facetwp-template">
               <div class="scholarship-card">
                 <span class="scholarship-card__sponsor">Tab{}Fund</span>
                 <p class="scholarship-card__description">Two{}lines</p>
               </div></div></body></html>"#,
            '\t', '\n'
        );
        assert!(ScholarshipAmerica.extract(&page).is_err());
    }
}
