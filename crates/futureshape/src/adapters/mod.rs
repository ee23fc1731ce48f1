//! Per-source HTML extraction.
//!
//! Each adapter locates one fixed container node and turns every entry
//! under it into a record. A missing container means "no data" and yields
//! an empty list. A missing field inside an entry becomes [`MISSING`].
//! Every entry passes through the sanitizer before it is accepted.
//!
//! All entry points are synchronous because `scraper::Html` is `!Send`;
//! the parsed document never lives across an await.

pub mod careeronestop;
pub mod collegeboard;
pub mod equality_map;
pub mod numbeo;
pub mod scholarship_america;

use crate::sanitize::SanitizeError;
use crate::types::{ExtractedRecord, SourceId};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Value recorded for a field the page did not carry.
pub const MISSING: &str = "N/A";

/// Turns one source's fetched body into records.
pub trait SourceAdapter: Send + Sync {
    /// The source this adapter understands.
    fn source(&self) -> SourceId;

    /// Extract all records from `body`. Only a sanitization failure is an
    /// error; absent markup yields fewer records or sentinel fields.
    fn extract(&self, body: &str) -> Result<Vec<ExtractedRecord>, SanitizeError>;
}

/// Adapters looked up by source identifier.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<SourceId, Box<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding an adapter for every known source.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(careeronestop::CareerOneStop));
        registry.register(Box::new(scholarship_america::ScholarshipAmerica));
        registry.register(Box::new(collegeboard::CollegeBoard));
        registry.register(Box::new(numbeo::Numbeo));
        registry.register(Box::new(equality_map::EqualityMap));
        registry
    }

    /// Add or replace the adapter for its source.
    pub fn register(&mut self, adapter: Box<dyn SourceAdapter>) {
        self.adapters.insert(adapter.source(), adapter);
    }

    pub fn get(&self, source: SourceId) -> Option<&dyn SourceAdapter> {
        self.adapters.get(&source).map(|a| a.as_ref())
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

// ── Shared extraction helpers ──

/// Parse a selector known at compile time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("adapter selectors are valid")
}

/// Run `build` over every entry under the container.
///
/// With `entry_css = None` the container itself is the single entry.
pub(crate) fn extract_entries<F>(
    body: &str,
    container_css: &str,
    entry_css: Option<&str>,
    mut build: F,
) -> Result<Vec<ExtractedRecord>, SanitizeError>
where
    F: FnMut(ElementRef<'_>) -> Result<Option<ExtractedRecord>, SanitizeError>,
{
    let document = Html::parse_document(body);
    let Some(container) = document.select(&selector(container_css)).next() else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    match entry_css {
        Some(css) => {
            let entry_sel = selector(css);
            for entry in container.select(&entry_sel) {
                if let Some(record) = build(entry)? {
                    records.push(record);
                }
            }
        }
        None => {
            if let Some(record) = build(container)? {
                records.push(record);
            }
        }
    }
    Ok(records)
}

/// Text nodes of an element, each trimmed, joined by single spaces.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first match under `entry`, or [`MISSING`].
pub(crate) fn field_text(entry: ElementRef<'_>, css: &str) -> String {
    entry
        .select(&selector(css))
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Attribute of the first match under `entry`, or [`MISSING`].
pub(crate) fn field_attr(entry: ElementRef<'_>, css: &str, attr: &str) -> String {
    entry
        .select(&selector(css))
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| MISSING.to_string())
}

/// Resolve a possibly relative link against the source's site root.
pub(crate) fn absolute_url(base: &str, href: &str) -> String {
    if href == MISSING {
        return href.to_string();
    }
    url::Url::parse(base)
        .and_then(|b| b.join(href))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_covers_every_source() {
        let registry = AdapterRegistry::standard();
        assert_eq!(registry.len(), 5);
        for source in [
            SourceId::Gov,
            SourceId::Org,
            SourceId::Collegeboard,
            SourceId::Numbeo,
            SourceId::Map,
        ] {
            assert_eq!(registry.get(source).unwrap().source(), source);
        }
    }

    #[test]
    fn test_empty_registry_lookup() {
        assert!(AdapterRegistry::new().get(SourceId::Gov).is_none());
    }

    #[test]
    fn test_element_text_joins_trimmed_nodes() {
        let doc = Html::parse_fragment("<p>  Hello <b> big </b>\n world </p>");
        let p = doc.select(&selector("p")).next().unwrap();
        assert_eq!(element_text(p), "Hello big world");
    }

    #[test]
    fn test_missing_fields_use_sentinel() {
        let doc = Html::parse_fragment(r#"<div><a>no href</a><span> </span></div>"#);
        let div = doc.select(&selector("div")).next().unwrap();
        assert_eq!(field_text(div, ".absent"), MISSING);
        assert_eq!(field_text(div, "span"), MISSING);
        assert_eq!(field_attr(div, "a", "href"), MISSING);
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("https://site.test", "/a/b?id=1"),
            "https://site.test/a/b?id=1"
        );
        assert_eq!(
            absolute_url("https://site.test", "https://other.test/x"),
            "https://other.test/x"
        );
        assert_eq!(absolute_url("https://site.test", MISSING), MISSING);
    }

    #[test]
    fn test_missing_container_is_empty() {
        let records = extract_entries("<html><body></body></html>", "#results", Some("li"), |_| {
            unreachable!("no entries expected")
        })
        .unwrap();
        assert!(records.is_empty());
    }
}
