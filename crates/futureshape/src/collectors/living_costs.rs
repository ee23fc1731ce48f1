//! Living costs: one city-to-city comparison, only when both cities and
//! both states are known. The comparison lands under the target role.

use super::{leaf, CollectContext};
use crate::query::Query;
use crate::report::{LivingCostSection, LivingCostSources};
use crate::types::{Category, ExtractedRecord, Role, SourceId};

const CATEGORY: Category = Category::LivingCosts;

pub async fn collect(ctx: &CollectContext<'_>, query: &Query) -> LivingCostSection {
    let (Some(target_city), Some(target_abbrev), Some(current_city), Some(current_abbrev)) = (
        query.city(Role::TargetState),
        query.state_abbrev(Role::TargetState),
        query.city(Role::CurrentState),
        query.state_abbrev(Role::CurrentState),
    ) else {
        ctx.skipped(CATEGORY, "comparison needs both regions");
        return LivingCostSection::default();
    };

    ctx.timed(CATEGORY, async {
        let vars = [
            ("current_city", current_city),
            ("current_state_abbrev", current_abbrev),
            ("target_city", target_city),
            ("target_state_abbrev", target_abbrev),
        ];
        let outcome = ctx
            .fetch_records(CATEGORY, SourceId::Numbeo, Role::TargetState, None, &vars)
            .await;

        let mut section = LivingCostSection::default();
        section.target_state = LivingCostSources {
            numbeo: leaf(
                outcome,
                CATEGORY,
                SourceId::Numbeo,
                Role::TargetState,
                ExtractedRecord::into_cost,
            ),
        };
        section
    })
    .await
}
