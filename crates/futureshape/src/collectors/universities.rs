//! Universities: one browser-rendered college search per role.

use super::{leaf, CollectContext};
use crate::query::Query;
use crate::report::{RoleMap, UniversitySection, UniversitySources};
use crate::types::{Category, ExtractedRecord, Role, SourceId};

const CATEGORY: Category = Category::Universities;

pub async fn collect(ctx: &CollectContext<'_>, query: &Query) -> UniversitySection {
    ctx.timed(CATEGORY, async {
        let (target_state, current_state) = tokio::join!(
            collect_role(ctx, query, Role::TargetState),
            collect_role(ctx, query, Role::CurrentState),
        );
        RoleMap::from_pair(target_state, current_state)
    })
    .await
}

async fn collect_role(ctx: &CollectContext<'_>, query: &Query, role: Role) -> UniversitySources {
    let Some(abbrev) = query.state_abbrev(role) else {
        return UniversitySources::default();
    };
    let major = query.major_slug.as_deref().unwrap_or_default();
    let vars = [("state_abbrev", abbrev), ("major", major)];

    let outcome = ctx
        .fetch_records(CATEGORY, SourceId::Collegeboard, role, None, &vars)
        .await;
    let collegeboard = leaf(
        outcome,
        CATEGORY,
        SourceId::Collegeboard,
        role,
        ExtractedRecord::into_university,
    )
    // An empty result page is as good as no answer.
    .filter(|list| !list.is_empty());

    UniversitySources { collegeboard }
}
