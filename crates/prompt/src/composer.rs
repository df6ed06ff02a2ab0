//! Snapshot serialization: one pure function from the aggregated
//! snapshot (plus the optional focused-lead block and the raw user
//! message) to the augmented prompt text.
//!
//! Absence is always explicit — a missing join renders as "Unknown",
//! "N/A" or "none", never as a silently dropped line — so the model can
//! tell "no data" apart from "data not shown".

use sp_domain::snapshot::{EnrichedLead, Snapshot};

use crate::format;

/// Build the augmented first-turn message.
///
/// Section order: focused-lead block (when present), numeric summary,
/// enriched lead sample, product catalog, and the verbatim user question
/// as the final segment.
pub fn compose(snapshot: &Snapshot, focused_context: Option<&str>, message: &str) -> String {
    let mut out = String::new();

    if let Some(context) = focused_context {
        out.push_str("FOCUSED LEAD (PRIORITY):\n");
        out.push_str(context);
        out.push_str("\n---\n\n");
    }

    out.push_str(&format!(
        "SUMMARY: {} leads | {} partners | {} products | {} orders\n\n",
        snapshot.total_leads,
        snapshot.total_partners,
        snapshot.total_products,
        snapshot.total_orders
    ));

    out.push_str(&format!("PIPELINE LEADS ({}):\n", snapshot.leads.len()));
    for lead in &snapshot.leads {
        out.push_str(&format_lead(lead));
    }

    out.push_str(&format!("\nPRODUCT CATALOG ({}):\n", snapshot.products.len()));
    for product in &snapshot.products {
        out.push_str(&format!(
            "- {} | Stock: {:.0} un\n",
            product.description, product.stock
        ));
    }

    out.push_str("\nQUESTION: ");
    out.push_str(message);
    out
}

fn format_lead(lead: &EnrichedLead) -> String {
    let due = lead.lead.due_date.as_deref().unwrap_or("N/A");

    let partner = lead
        .partner
        .as_ref()
        .map(|p| p.name.as_str())
        .unwrap_or("none");

    let products = if lead.products.is_empty() {
        "none".to_string()
    } else {
        lead.products
            .iter()
            .map(|p| format!("{} ({:.0}x)", p.description, p.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let last_activity = lead
        .last_activity
        .as_ref()
        .map(|a| format!("{} on {}", a.kind, format::date(&a.timestamp)))
        .unwrap_or_else(|| "none".into());

    format!(
        "- {} (ID: {}) | {}\n  \
         {} -> {} | Due: {}\n  \
         Partner: {}\n  \
         Products: {}\n  \
         Last activity: {}\n",
        lead.lead.name,
        lead.lead.id,
        format::currency(lead.lead.value),
        lead.funnel_name,
        lead.stage_name,
        due,
        partner,
        products,
        last_activity,
    )
}
