//! Core data types for the aggregation engine.

use serde::{Deserialize, Serialize};

/// One gazetteer row identifying a city, its state and the state's
/// postal abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// Country column, when the row carries one.
    pub country: Option<String>,
    /// Full state name as stored in the gazetteer (e.g. "Florida").
    pub state_name: String,
    /// Two-letter state abbreviation (e.g. "FL").
    pub state_abbrev: String,
    /// City name (e.g. "Miami").
    pub city_name: String,
}

impl RegionRecord {
    /// "City, State" form, suitable for feeding back into a resolve.
    pub fn canonical_name(&self) -> String {
        format!("{}, {}", self.city_name, self.state_name)
    }

    /// Lower-cased, hyphenated state name ("new-york").
    pub fn state_slug(&self) -> String {
        self.state_name
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Which side of the comparison a region plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Where the student wants to study.
    TargetState,
    /// Where the student lives now.
    CurrentState,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::TargetState, Role::CurrentState];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TargetState => write!(f, "target_state"),
            Self::CurrentState => write!(f, "current_state"),
        }
    }
}

/// Report category, one per collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Scholarships,
    Universities,
    LivingCosts,
    QueerScoring,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scholarships => write!(f, "scholarships"),
            Self::Universities => write!(f, "universities"),
            Self::LivingCosts => write!(f, "living_costs"),
            Self::QueerScoring => write!(f, "queer_scoring"),
        }
    }
}

/// Identifier of an external data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// CareerOneStop scholarship finder (fixed-size single page).
    Gov,
    /// Scholarship America listings (paginated).
    Org,
    /// BigFuture college search (client-side rendered).
    Collegeboard,
    /// Numbeo city-to-city cost comparison.
    Numbeo,
    /// Movement Advancement Project state profile.
    Map,
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gov => write!(f, "gov"),
            Self::Org => write!(f, "org"),
            Self::Collegeboard => write!(f, "collegeboard"),
            Self::Numbeo => write!(f, "numbeo"),
            Self::Map => write!(f, "map"),
        }
    }
}

/// How a source must be retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Plain stateless GET.
    #[default]
    Fast,
    /// Full headless-browser render.
    Rendered,
}

// ── Extracted records ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scholarship {
    pub url: String,
    pub organization_name: String,
    pub organization_purpose: String,
    pub award_type: String,
    pub award_amount: String,
    pub submission_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub url: String,
    pub name: String,
    pub location: String,
    pub overview: String,
    pub graduation_rate: String,
    pub average_tuition: String,
    pub sat_range: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntry {
    pub entry_name: String,
    pub current_cost: String,
    pub target_cost: String,
    pub difference: String,
}

/// State equality profile: five quick-fact percentages and three policy
/// tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualityFacts {
    pub population_share: String,
    pub workforce_share: String,
    pub raising_children_share: String,
    pub people_of_color_share: String,
    pub rural_share: String,
    pub sexual_orientation_tally: String,
    pub gender_identity_tally: String,
    pub overall_tally: String,
}

/// A record produced by a source adapter. The variant follows the
/// adapter's category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtractedRecord {
    Scholarship(Scholarship),
    University(University),
    Cost(CostEntry),
    Equality(EqualityFacts),
}

impl ExtractedRecord {
    pub fn into_scholarship(self) -> Option<Scholarship> {
        match self {
            Self::Scholarship(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_university(self) -> Option<University> {
        match self {
            Self::University(u) => Some(u),
            _ => None,
        }
    }

    pub fn into_cost(self) -> Option<CostEntry> {
        match self {
            Self::Cost(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_equality(self) -> Option<EqualityFacts> {
        match self {
            Self::Equality(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors raised while loading engine inputs.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Region data error: {0}")]
    RegionData(String),
}

/// Convenience result type.
pub type EngineResult<T> = Result<T, EngineError>;
