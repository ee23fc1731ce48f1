//! Scholarships: a single-page government listing and a paginated
//! community listing, both per role, all four sub-flows concurrent.

use super::{leaf, typed, CollectContext};
use crate::query::Query;
use crate::report::{RoleMap, ScholarshipSection, ScholarshipSources};
use crate::types::{Category, ExtractedRecord, RegionRecord, Role, Scholarship, SourceId};
use tracing::{debug, warn};

const CATEGORY: Category = Category::Scholarships;

/// The government listing returns everything on one page.
const GOV_PAGE: &str = "1";

pub async fn collect(ctx: &CollectContext<'_>, query: &Query) -> ScholarshipSection {
    ctx.timed(CATEGORY, async {
        let (target_state, current_state) = tokio::join!(
            collect_role(ctx, query, Role::TargetState),
            collect_role(ctx, query, Role::CurrentState),
        );
        RoleMap::from_pair(target_state, current_state)
    })
    .await
}

async fn collect_role(ctx: &CollectContext<'_>, query: &Query, role: Role) -> ScholarshipSources {
    let Some(region) = query.region(role) else {
        return ScholarshipSources::default();
    };
    let (gov, org) = tokio::join!(
        single_page(ctx, region, role),
        paginated(ctx, region, role)
    );
    ScholarshipSources { gov, org }
}

async fn single_page(
    ctx: &CollectContext<'_>,
    region: &RegionRecord,
    role: Role,
) -> Option<Vec<Scholarship>> {
    let vars = [
        ("state_name", region.state_name.as_str()),
        ("page_number", GOV_PAGE),
    ];
    let outcome = ctx
        .fetch_records(CATEGORY, SourceId::Gov, role, None, &vars)
        .await;
    leaf(
        outcome,
        CATEGORY,
        SourceId::Gov,
        role,
        ExtractedRecord::into_scholarship,
    )
}

/// Walk pages `0..org_page_limit`, stopping at the first page that fails
/// or comes back empty. Records from every page before the stop are kept.
/// The leaf is `None` only when the very first page was unavailable.
async fn paginated(
    ctx: &CollectContext<'_>,
    region: &RegionRecord,
    role: Role,
) -> Option<Vec<Scholarship>> {
    let slug = region.state_slug();
    let mut gathered: Option<Vec<Scholarship>> = None;

    for page in 0..ctx.config.org_page_limit {
        let page_number = page.to_string();
        let vars = [("state_slug", slug.as_str()), ("page_number", page_number.as_str())];

        match ctx
            .fetch_records(CATEGORY, SourceId::Org, role, Some(page), &vars)
            .await
        {
            Ok(Some(records)) if !records.is_empty() => {
                gathered
                    .get_or_insert_with(Vec::new)
                    .extend(typed(records, ExtractedRecord::into_scholarship));
            }
            Ok(Some(_)) => {
                debug!("org listing for {role} exhausted at page {page}");
                gathered.get_or_insert_with(Vec::new);
                break;
            }
            Ok(None) => break,
            Err(e) => {
                warn!("org listing for {role} abandoned at page {page}: {e}");
                break;
            }
        }
    }
    gathered
}
