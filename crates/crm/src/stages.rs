//! Per-funnel stage index.

use std::collections::HashMap;

use futures_util::future::join_all;

use sp_domain::entity::{AuthContext, Funnel, Stage};

use crate::client::CrmFetch;

/// Fetch the ordered stage list of every funnel, all concurrently, and
/// fold the results into a map keyed by funnel id.
///
/// Each branch produces an independent `(funnel_id, stages)` pair; the
/// map is assembled only after every branch has settled, so no shared
/// accumulator is written from concurrent code.  A funnel whose stage
/// fetch fails contributes an empty list, not an error.  The result has
/// exactly one entry per input funnel.
pub async fn build_stage_index(
    crm: &dyn CrmFetch,
    funnels: &[Funnel],
    auth: &AuthContext,
) -> HashMap<String, Vec<Stage>> {
    let fetches = funnels.iter().map(|funnel| async move {
        let stages = crm.funnel_stages(&funnel.id, auth).await;
        (funnel.id.clone(), stages)
    });

    join_all(fetches).await.into_iter().collect()
}
