//! The aggregation report.
//!
//! Every category holds both roles and every role holds every source of
//! that category. A leaf is `Some(records)` when the source answered and
//! `None` (serialized as `null`) when it was unavailable or skipped, so the
//! default value of each type is its skeleton.

use crate::types::{CostEntry, EqualityFacts, Role, Scholarship, University};
use serde::{Deserialize, Serialize};

/// One value per region role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMap<S> {
    pub target_state: S,
    pub current_state: S,
}

impl<S> RoleMap<S> {
    pub fn get(&self, role: Role) -> &S {
        match role {
            Role::TargetState => &self.target_state,
            Role::CurrentState => &self.current_state,
        }
    }

    pub fn get_mut(&mut self, role: Role) -> &mut S {
        match role {
            Role::TargetState => &mut self.target_state,
            Role::CurrentState => &mut self.current_state,
        }
    }

    /// Build both roles from independently produced values.
    pub fn from_pair(target_state: S, current_state: S) -> Self {
        Self {
            target_state,
            current_state,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarshipSources {
    pub gov: Option<Vec<Scholarship>>,
    pub org: Option<Vec<Scholarship>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversitySources {
    pub collegeboard: Option<Vec<University>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivingCostSources {
    pub numbeo: Option<Vec<CostEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualitySources {
    pub map: Option<Vec<EqualityFacts>>,
}

pub type ScholarshipSection = RoleMap<ScholarshipSources>;
pub type UniversitySection = RoleMap<UniversitySources>;
pub type LivingCostSection = RoleMap<LivingCostSources>;
pub type EqualitySection = RoleMap<EqualitySources>;

/// The full comparison report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub scholarships: ScholarshipSection,
    pub universities: UniversitySection,
    pub living_costs: LivingCostSection,
    pub queer_scoring: EqualitySection,
}

impl Report {
    /// The all-null report.
    pub fn skeleton() -> Self {
        Self::default()
    }

    pub fn builder() -> ReportBuilder {
        ReportBuilder::default()
    }
}

/// Assembles a report section by section. Sections that are never set
/// stay at their skeleton.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    report: Report,
}

impl ReportBuilder {
    pub fn scholarships(mut self, section: ScholarshipSection) -> Self {
        self.report.scholarships = section;
        self
    }

    pub fn universities(mut self, section: UniversitySection) -> Self {
        self.report.universities = section;
        self
    }

    pub fn living_costs(mut self, section: LivingCostSection) -> Self {
        self.report.living_costs = section;
        self
    }

    pub fn queer_scoring(mut self, section: EqualitySection) -> Self {
        self.report.queer_scoring = section;
        self
    }

    pub fn build(self) -> Report {
        self.report
    }
}
