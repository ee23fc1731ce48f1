//! Equality scoring: the state policy profile for each role, collected
//! only when the query asks for it.

use super::{leaf, CollectContext};
use crate::query::Query;
use crate::report::{EqualitySection, EqualitySources, RoleMap};
use crate::types::{Category, ExtractedRecord, Role, SourceId};

const CATEGORY: Category = Category::QueerScoring;

pub async fn collect(ctx: &CollectContext<'_>, query: &Query) -> EqualitySection {
    if !query.use_equality_scoring {
        ctx.skipped(CATEGORY, "equality scoring not requested");
        return EqualitySection::default();
    }

    ctx.timed(CATEGORY, async {
        let (target_state, current_state) = tokio::join!(
            collect_role(ctx, query, Role::TargetState),
            collect_role(ctx, query, Role::CurrentState),
        );
        RoleMap::from_pair(target_state, current_state)
    })
    .await
}

async fn collect_role(ctx: &CollectContext<'_>, query: &Query, role: Role) -> EqualitySources {
    let Some(abbrev) = query.state_abbrev(role) else {
        return EqualitySources::default();
    };
    let outcome = ctx
        .fetch_records(CATEGORY, SourceId::Map, role, None, &[("state_abbrev", abbrev)])
        .await;
    EqualitySources {
        map: leaf(outcome, CATEGORY, SourceId::Map, role, ExtractedRecord::into_equality),
    }
}
