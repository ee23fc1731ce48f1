//! Field-of-study catalog built from College Board's major listing.
//!
//! The listing groups majors under umbrella entries. The catalog flattens
//! it into two parallel lists: every slug in listing order, and whether
//! that slug is a related (non-umbrella) major.

use crate::types::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    data: Vec<UmbrellaMajor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UmbrellaMajor {
    #[serde(default)]
    title_slug: Option<String>,
    #[serde(default)]
    related_majors: Option<Vec<RelatedMajor>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelatedMajor {
    #[serde(default)]
    title_slug: Option<String>,
}

/// Flattened major catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorCatalog {
    #[serde(rename = "major-id")]
    pub major_ids: Vec<String>,
    #[serde(rename = "is-related")]
    pub is_related: Vec<bool>,
}

impl MajorCatalog {
    /// Parse a College Board listing document. Entries without a slug, or
    /// with a `null` one, keep their position with an empty slug.
    pub fn from_college_board(json: &str) -> EngineResult<Self> {
        let listing: Listing = serde_json::from_str(json)?;
        let mut catalog = Self::default();
        for umbrella in listing.data {
            catalog.push(umbrella.title_slug.unwrap_or_default(), false);
            for related in umbrella.related_majors.unwrap_or_default() {
                catalog.push(related.title_slug.unwrap_or_default(), true);
            }
        }
        Ok(catalog)
    }

    /// Read and parse a listing file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(EngineError::Config(format!(
                "major listing {} is not a file",
                path.display()
            )));
        }
        Self::from_college_board(&std::fs::read_to_string(path)?)
    }

    fn push(&mut self, slug: String, related: bool) {
        self.major_ids.push(slug);
        self.is_related.push(related);
    }

    pub fn len(&self) -> usize {
        self.major_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.major_ids.is_empty()
    }

    pub fn contains(&self, slug: &str) -> bool {
        !slug.is_empty() && self.major_ids.iter().any(|id| id == slug)
    }

    /// Whether `slug` is listed, and if so whether it is a related major.
    pub fn is_related(&self, slug: &str) -> Option<bool> {
        self.major_ids
            .iter()
            .position(|id| id == slug)
            .and_then(|i| self.is_related.get(i).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LISTING: &str = r#"{
        "data": [
            {
                "titleSlug": "computer-science",
                "relatedMajors": [
                    {"titleSlug": "computer-engineering"},
                    {"titleSlug": "information-technology"}
                ]
            },
            {"titleSlug": "biology"},
            {"relatedMajors": [{}]}
        ]
    }"#;

    #[test]
    fn test_flattens_umbrella_and_related() {
        let catalog = MajorCatalog::from_college_board(LISTING).unwrap();
        assert_eq!(
            catalog.major_ids,
            ["computer-science", "computer-engineering", "information-technology", "biology", "", ""]
        );
        assert_eq!(catalog.is_related, [false, true, true, false, false, true]);
        assert!(catalog.contains("biology"));
        assert!(!catalog.contains(""));
        assert_eq!(catalog.is_related("computer-engineering"), Some(true));
        assert_eq!(catalog.is_related("history"), None);
    }

    #[test]
    fn test_serializes_hyphenated_keys() {
        let catalog = MajorCatalog::from_college_board(r#"{"data":[{"titleSlug":"art"}]}"#).unwrap();
        assert_eq!(
            serde_json::to_value(&catalog).unwrap(),
            json!({"major-id": ["art"], "is-related": [false]})
        );
    }

    #[test]
    fn test_null_slugs_become_empty() {
        let listing = r#"{"data":[
            {"titleSlug": null, "relatedMajors": [{"titleSlug": null}, {"titleSlug": "ecology"}]},
            {"titleSlug": "music", "relatedMajors": null}
        ]}"#;
        let catalog = MajorCatalog::from_college_board(listing).unwrap();
        assert_eq!(catalog.major_ids, ["", "", "ecology", "music"]);
        assert_eq!(catalog.is_related, [false, true, true, false]);
    }

    #[test]
    fn test_missing_data_is_empty() {
        assert!(MajorCatalog::from_college_board("{}").unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MajorCatalog::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
