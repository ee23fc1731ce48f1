//! Movement Advancement Project state profile.
//!
//! One profile per page: five quick facts followed by three policy tally
//! scores. Quick facts are prose ("4.6% of adults ..."), so the percent
//! token is pulled out when present.

use super::{element_text, extract_entries, field_text, selector, SourceAdapter, MISSING};
use crate::sanitize::{RecordPayload, SanitizeError};
use crate::types::{EqualityFacts, ExtractedRecord, SourceId};
use regex::Regex;
use std::sync::OnceLock;

const CONTAINER: &str = "#state-profile";

const QUICK_FACT: &str = ".quick-facts .quick-fact";
const SEXUAL_ORIENTATION: &str = ".policy-tally.sexual-orientation .tally-score";
const GENDER_IDENTITY: &str = ".policy-tally.gender-identity .tally-score";
const OVERALL: &str = ".policy-tally.overall .tally-score";

/// Keys for the quick facts, in page order.
const QUICK_FACT_KEYS: [&str; 5] = [
    "population_share",
    "workforce_share",
    "raising_children_share",
    "people_of_color_share",
    "rural_share",
];

fn percent_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?\s?%").expect("percent regex is valid"))
}

/// The first percent token of a quick fact, or its whole text.
fn quick_fact_value(text: &str) -> String {
    match percent_token().find(text) {
        Some(m) => m.as_str().replace(' ', ""),
        None if text.is_empty() => MISSING.to_string(),
        None => text.to_string(),
    }
}

pub struct EqualityMap;

impl SourceAdapter for EqualityMap {
    fn source(&self) -> SourceId {
        SourceId::Map
    }

    fn extract(&self, body: &str) -> Result<Vec<ExtractedRecord>, SanitizeError> {
        let fact_sel = selector(QUICK_FACT);
        extract_entries(body, CONTAINER, None, |profile| {
            let facts: Vec<String> = profile
                .select(&fact_sel)
                .map(|el| quick_fact_value(&element_text(el)))
                .collect();

            let mut payload = RecordPayload::new();
            for (i, key) in QUICK_FACT_KEYS.iter().enumerate() {
                payload = payload.field(key, facts.get(i).map(String::as_str).unwrap_or(MISSING));
            }
            let facts: EqualityFacts = payload
                .field("sexual_orientation_tally", &field_text(profile, SEXUAL_ORIENTATION))
                .field("gender_identity_tally", &field_text(profile, GENDER_IDENTITY))
                .field("overall_tally", &field_text(profile, OVERALL))
                .decode()?;
            Ok(Some(ExtractedRecord::Equality(facts)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<section id="state-profile">
  <div class="quick-facts">
    <div class="quick-fact"><strong>4.6%</strong> of adults (18+) are LGBTQ</div>
    <div class="quick-fact"><strong>5 %</strong> of the workforce is LGBTQ</div>
    <div class="quick-fact"><strong>27%</strong> of LGBTQ people are raising children</div>
    <div class="quick-fact"><strong>45%</strong> of LGBTQ people are people of color</div>
    <div class="quick-fact">Rural share not reported</div>
  </div>
  <div class="policy-tally sexual-orientation"><span class="tally-score">15.5/20</span></div>
  <div class="policy-tally gender-identity"><span class="tally-score">-1.75/22.5</span></div>
  <div class="policy-tally overall"><span class="tally-score">13.75/42.5</span></div>
</section>
</body></html>"#;

    #[test]
    fn test_extracts_profile() {
        let records = EqualityMap.extract(PAGE).unwrap();
        assert_eq!(records.len(), 1);

        let facts = records[0].clone().into_equality().unwrap();
        assert_eq!(facts.population_share, "4.6%");
        assert_eq!(facts.workforce_share, "5%");
        assert_eq!(facts.raising_children_share, "27%");
        assert_eq!(facts.people_of_color_share, "45%");
        assert_eq!(facts.rural_share, "Rural share not reported");
        assert_eq!(facts.sexual_orientation_tally, "15.5/20");
        assert_eq!(facts.gender_identity_tally, "-1.75/22.5");
        assert_eq!(facts.overall_tally, "13.75/42.5");
    }

    #[test]
    fn test_partial_profile_uses_sentinel() {
        let page = r#"<div id="state-profile"><div class="quick-facts">
            <div class="quick-fact">3.9% of adults</div></div></div>"#;
        let facts = EqualityMap.extract(page).unwrap()[0].clone().into_equality().unwrap();
        assert_eq!(facts.population_share, "3.9%");
        assert_eq!(facts.workforce_share, MISSING);
        assert_eq!(facts.overall_tally, MISSING);
    }

    #[test]
    fn test_no_profile_is_empty() {
        assert!(EqualityMap.extract("<html><body>404</body></html>").unwrap().is_empty());
    }
}
