//! Snapshot orchestration: the full fan-out that turns the live CRM
//! collections into one bounded, enriched [`Snapshot`].

use futures_util::future::join_all;

use sp_domain::config::SnapshotConfig;
use sp_domain::entity::AuthContext;
use sp_domain::snapshot::Snapshot;

use crate::client::CrmFetch;
use crate::enrich::enrich_lead;
use crate::stages::build_stage_index;

/// Assemble the per-request snapshot.
///
/// Fetches leads, funnels, partners, products and orders concurrently,
/// builds the stage index, enriches a bounded lead sample (input order
/// preserved), and truncates the catalog collections to their
/// presentation limits while keeping the true totals.
///
/// When `focused_lead_id` names a lead the caller already has open, that
/// lead is dropped from the general sample — it is presented separately
/// and must not appear twice.
///
/// Returns `None` only when the snapshot cannot be assembled at all;
/// callers treat that as "no enrichment context available" and carry on
/// without it.  Individual endpoint failures were already absorbed into
/// empty defaults by the fetch layer, so they never produce `None`, and
/// nothing here retries.
pub async fn aggregate(
    crm: &dyn CrmFetch,
    auth: &AuthContext,
    user_name: &str,
    focused_lead_id: Option<&str>,
    limits: &SnapshotConfig,
) -> Option<Snapshot> {
    let (leads, funnels, partners_page, products_page, orders) = tokio::join!(
        crm.leads(auth),
        crm.funnels(auth),
        crm.partners(auth),
        crm.catalog_products(auth),
        crm.orders(None, auth),
    );

    tracing::debug!(
        leads = leads.len(),
        funnels = funnels.len(),
        partners = partners_page.items.len(),
        products = products_page.items.len(),
        orders = orders.len(),
        "CRM collections fetched"
    );

    let stage_index = build_stage_index(crm, &funnels, auth).await;

    // Bounded sample in fetch order, minus the focused lead (if any).
    let sample: Vec<_> = leads
        .iter()
        .take(limits.lead_sample)
        .filter(|l| focused_lead_id != Some(l.id.as_str()))
        .cloned()
        .collect();

    let enriched = join_all(sample.into_iter().map(|lead| {
        enrich_lead(
            crm,
            lead,
            &funnels,
            &stage_index,
            &partners_page.items,
            auth,
            limits,
        )
    }))
    .await;

    let total_leads = leads.len();
    let total_partners = partners_page.effective_total();
    let total_products = products_page.effective_total();
    let total_orders = orders.len();

    let mut partners = partners_page.items;
    partners.truncate(limits.partner_limit);
    let mut products = products_page.items;
    products.truncate(limits.product_limit);
    let mut orders = orders;
    orders.truncate(limits.order_limit);

    Some(Snapshot {
        user_name: user_name.to_owned(),
        leads: enriched,
        funnels,
        stage_index,
        partners,
        products,
        orders,
        total_leads,
        total_partners,
        total_products,
        total_orders,
    })
}
