//! CareerOneStop scholarship finder results table.

use super::{absolute_url, extract_entries, field_attr, field_text, SourceAdapter};
use crate::sanitize::{RecordPayload, SanitizeError};
use crate::types::{ExtractedRecord, Scholarship, SourceId};

const SITE_ROOT: &str = "https://www.careeronestop.org";

const CONTAINER: &str = "table#scholarshipTable > tbody";
const ENTRY: &str = "tr";

const LINK: &str = "td[data-label='Award Name'] a";
const ORGANIZATION: &str = "td[data-label='Award Name'] .scholarship-org";
const PURPOSE: &str = "td[data-label='Award Name'] .scholarship-purpose";
const AWARD_TYPE: &str = "td[data-label='Award Type']";
const AWARD_AMOUNT: &str = "td[data-label='Award Amount']";
const DEADLINE: &str = "td[data-label='Deadline']";

pub struct CareerOneStop;

impl SourceAdapter for CareerOneStop {
    fn source(&self) -> SourceId {
        SourceId::Gov
    }

    fn extract(&self, body: &str) -> Result<Vec<ExtractedRecord>, SanitizeError> {
        extract_entries(body, CONTAINER, Some(ENTRY), |row| {
            // Header and spacer rows carry no data cells.
            if row.select(&super::selector("td")).next().is_none() {
                return Ok(None);
            }
            let scholarship: Scholarship = RecordPayload::new()
                .field("url", &absolute_url(SITE_ROOT, &field_attr(row, LINK, "href")))
                .field("organization_name", &field_text(row, ORGANIZATION))
                .field("organization_purpose", &field_text(row, PURPOSE))
                .field("award_type", &field_text(row, AWARD_TYPE))
                .field("award_amount", &field_text(row, AWARD_AMOUNT))
                .field("submission_date", &field_text(row, DEADLINE))
                .decode()?;
            Ok(Some(ExtractedRecord::Scholarship(scholarship)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MISSING;

    const PAGE: &str = r#"
<html><body>
<table id="scholarshipTable">
  <tbody>
    <tr><th>Award Name</th><th>Award Type</th></tr>
    <tr>
      <td data-label="Award Name">
        <a href="/toolkit/training/scholarship-detail.aspx?id=42">Sunshine Award</a>
        <div class="scholarship-org">Florida Bright Futures</div>
        <div class="scholarship-purpose">Rewards high school
achievement</div>
      </td>
      <td data-label="Award Type">Scholarship</td>
      <td data-label="Award Amount">$2,500</td>
      <td data-label="Deadline">03/01/2027</td>
    </tr>
    <tr>
      <td data-label="Award Name"><div class="scholarship-org">Quiet Fund</div></td>
      <td data-label="Award Type">Grant</td>
    </tr>
  </tbody>
</table>
</body></html>"#;

    #[test]
    fn test_extracts_rows_and_skips_headers() {
        let records = CareerOneStop.extract(PAGE).unwrap();
        assert_eq!(records.len(), 2);

        let first = records[0].clone().into_scholarship().unwrap();
        assert_eq!(
            first.url,
            "https://www.careeronestop.org/toolkit/training/scholarship-detail.aspx?id=42"
        );
        assert_eq!(first.organization_name, "Florida Bright Futures");
        // The raw newline inside the text node is stripped by the sanitizer.
        assert_eq!(first.organization_purpose, "Rewards high schoolachievement");
        assert_eq!(first.award_amount, "$2,500");
        assert_eq!(first.submission_date, "03/01/2027");
    }

    #[test]
    fn test_missing_cells_become_sentinel() {
        let records = CareerOneStop.extract(PAGE).unwrap();
        let second = records[1].clone().into_scholarship().unwrap();
        assert_eq!(second.url, MISSING);
        assert_eq!(second.organization_name, "Quiet Fund");
        assert_eq!(second.award_amount, MISSING);
        assert_eq!(second.submission_date, MISSING);
    }

    #[test]
    fn test_page_without_table_is_empty() {
        let records = CareerOneStop
            .extract("<html><body><p>No results found.</p></body></html>")
            .unwrap();
        assert!(records.is_empty());
    }
}
