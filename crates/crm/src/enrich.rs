//! Lead enrichment: join one lead against the already-fetched reference
//! collections and pull in its per-lead detail.

use std::collections::HashMap;

use sp_domain::config::SnapshotConfig;
use sp_domain::entity::{AuthContext, Funnel, Lead, Partner, Stage};
use sp_domain::snapshot::{EnrichedLead, PartnerSummary, StageSummary};

use crate::client::CrmFetch;

/// Join a lead to its funnel, stage and partner, and fetch its
/// activities, product links, and (when a partner is linked) that
/// partner's recent orders — all three fetches concurrently.
///
/// Joins are against the caller's fetch snapshot; nothing here re-reads
/// a reference collection.  A lead whose funnel or stage id has no match
/// gets the `Unknown` sentinels and still enriches normally.  When no
/// partner matches, the order fetch is skipped outright (absence is not
/// a failure).  Fetch failures below were already absorbed into empty
/// defaults, so one bad lead never disturbs its siblings.
pub async fn enrich_lead(
    crm: &dyn CrmFetch,
    lead: Lead,
    funnels: &[Funnel],
    stage_index: &HashMap<String, Vec<Stage>>,
    partners: &[Partner],
    auth: &AuthContext,
    limits: &SnapshotConfig,
) -> EnrichedLead {
    // Reference sets are small (tens of rows); linear scans beat
    // building throwaway maps per lead.
    let funnel = funnels.iter().find(|f| f.id == lead.funnel_id);
    let stages: &[Stage] = stage_index
        .get(&lead.funnel_id)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let stage = stages.iter().find(|s| s.id == lead.stage_id);
    let partner = lead
        .partner_id
        .as_deref()
        .and_then(|pid| partners.iter().find(|p| p.id == pid));

    let (activities, products, partner_orders) = tokio::join!(
        crm.lead_activities(&lead.id, auth),
        crm.lead_products(&lead.id, auth),
        async {
            match partner {
                Some(p) => crm.orders(Some(&p.id), auth).await,
                None => Vec::new(),
            }
        },
    );

    // Only active product links are surfaced.
    let products: Vec<_> = products.into_iter().filter(|p| p.active).collect();

    let mut activities = activities;
    activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let last_activity = activities.first().cloned();

    let mut partner_orders = partner_orders;
    partner_orders.truncate(limits.partner_order_limit);

    // Start from the sentinel record and overwrite what actually joined.
    let mut enriched = EnrichedLead::unenriched(lead);
    if let Some(f) = funnel {
        enriched.funnel_name = f.name.clone();
        enriched.funnel_color = f.color.clone();
    }
    if let Some(s) = stage {
        enriched.stage_name = s.name.clone();
        enriched.stage_order = s.order;
        enriched.stage_color = s.color.clone();
    }
    enriched.funnel_stages = stages.iter().map(StageSummary::from).collect();
    enriched.partner = partner.map(|p| PartnerSummary {
        id: p.id.clone(),
        name: p.name.clone(),
        document: p.document.clone(),
        city: p.city.clone(),
        active: p.active,
    });
    enriched.products = products;
    enriched.activities = activities;
    enriched.last_activity = last_activity;
    enriched.partner_orders = partner_orders;
    enriched
}
