//! Query normalization.

use crate::region::RegionIndex;
use crate::types::{RegionRecord, Role};
use serde::Serialize;
use tracing::debug;

/// A validated comparison request. Built once per request, read-only
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    /// Where the student wants to study. `None` when the text did not
    /// resolve; the role is then omitted everywhere downstream.
    pub target_region: Option<RegionRecord>,
    /// Where the student lives now.
    pub current_region: Option<RegionRecord>,
    /// URL-safe field-of-study slug ("computer-science").
    pub major_slug: Option<String>,
    /// Whether to collect the state equality profile.
    pub use_equality_scoring: bool,
}

impl Query {
    /// Build a query from raw user input. Never fails: unresolved regions
    /// become `None`, the flag defaults to `false`.
    pub fn build(
        index: &RegionIndex,
        raw_target: Option<&str>,
        raw_current: Option<&str>,
        raw_major: Option<&str>,
        raw_flag: Option<bool>,
    ) -> Self {
        let target_region = raw_target.and_then(|t| index.resolve(t)).cloned();
        let current_region = raw_current.and_then(|t| index.resolve(t)).cloned();

        if target_region.is_none() {
            debug!("target region {:?} did not resolve", raw_target);
        }
        if current_region.is_none() {
            debug!("current region {:?} did not resolve", raw_current);
        }

        Self {
            target_region,
            current_region,
            major_slug: raw_major.and_then(major_slug),
            use_equality_scoring: raw_flag.unwrap_or(false),
        }
    }

    /// The region playing `role`, if it resolved.
    pub fn region(&self, role: Role) -> Option<&RegionRecord> {
        match role {
            Role::TargetState => self.target_region.as_ref(),
            Role::CurrentState => self.current_region.as_ref(),
        }
    }

    pub fn city(&self, role: Role) -> Option<&str> {
        self.region(role).map(|r| r.city_name.as_str())
    }

    pub fn state_abbrev(&self, role: Role) -> Option<&str> {
        self.region(role).map(|r| r.state_abbrev.as_str())
    }
}

/// Trim, lower-case and hyphenate a major name. Blank input yields `None`.
pub fn major_slug(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase().replace(' ', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> RegionIndex {
        RegionIndex::from_records(vec![
            RegionRecord {
                country: None,
                state_name: "Florida".to_string(),
                state_abbrev: "FL".to_string(),
                city_name: "Miami".to_string(),
            },
            RegionRecord {
                country: None,
                state_name: "Washington".to_string(),
                state_abbrev: "WA".to_string(),
                city_name: "Seattle".to_string(),
            },
        ])
    }

    #[test]
    fn test_build_resolves_both_roles() {
        let q = Query::build(
            &index(),
            Some("Seattle"),
            Some("Miami, Florida"),
            Some("  Computer Science "),
            Some(true),
        );
        assert_eq!(q.state_abbrev(Role::TargetState), Some("WA"));
        assert_eq!(q.city(Role::CurrentState), Some("Miami"));
        assert_eq!(q.major_slug.as_deref(), Some("computer-science"));
        assert!(q.use_equality_scoring);
    }

    #[test]
    fn test_build_never_fails_on_missing_input() {
        let idx = index();
        let inputs: [Option<&str>; 3] = [None, Some(""), Some("Fooville")];
        for target in inputs {
            for current in inputs {
                for flag in [None, Some(false), Some(true)] {
                    let q = Query::build(&idx, target, current, None, flag);
                    assert!(q.target_region.is_none());
                    assert!(q.current_region.is_none());
                    assert_eq!(q.use_equality_scoring, flag.unwrap_or(false));
                }
            }
        }
    }

    #[test]
    fn test_unresolved_target_keeps_current() {
        let q = Query::build(&index(), Some("Fooville"), Some("Miami, Florida"), None, None);
        assert!(q.region(Role::TargetState).is_none());
        assert_eq!(q.state_abbrev(Role::CurrentState), Some("FL"));
        assert!(!q.use_equality_scoring);
        assert!(q.major_slug.is_none());
    }

    #[test]
    fn test_major_slug() {
        assert_eq!(major_slug("Marine Biology").as_deref(), Some("marine-biology"));
        assert_eq!(major_slug("   ").as_deref(), None);
        assert_eq!(major_slug("art").as_deref(), Some("art"));
    }
}
