//! The per-request aggregated view of CRM data.
//!
//! A [`Snapshot`] is built at most once per chat request (only on the
//! first turn of a conversation), is never mutated after construction,
//! and is discarded when the request ends.  Every embedded join reflects
//! a single consistent fetch pass — no entity is re-fetched while a
//! snapshot is being assembled.

use std::collections::HashMap;

use serde::Serialize;

use crate::entity::{Activity, CatalogProduct, Funnel, Lead, LeadProduct, Order, Stage};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Enriched lead
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Sentinel shown when a lead's funnel or stage id has no match in the
/// fetched reference data.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Sentinel color for unmatched funnel/stage joins.
pub const UNKNOWN_COLOR: &str = "#808080";

/// Compact partner projection embedded in an enriched lead.
#[derive(Debug, Clone, Serialize)]
pub struct PartnerSummary {
    pub id: String,
    pub name: String,
    pub document: Option<String>,
    pub city: Option<String>,
    pub active: bool,
}

/// One stage of the lead's funnel, as carried on the enriched record.
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub name: String,
    pub order: i32,
    pub color: String,
}

impl From<&Stage> for StageSummary {
    fn from(s: &Stage) -> Self {
        Self {
            name: s.name.clone(),
            order: s.order,
            color: s.color.clone(),
        }
    }
}

/// A lead joined to its funnel, stage, partner, products, activities and
/// recent partner orders.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedLead {
    pub lead: Lead,
    pub funnel_name: String,
    pub funnel_color: String,
    pub stage_name: String,
    pub stage_order: i32,
    pub stage_color: String,
    /// The full ordered stage list of the lead's funnel.
    pub funnel_stages: Vec<StageSummary>,
    pub partner: Option<PartnerSummary>,
    /// Active product links only.
    pub products: Vec<LeadProduct>,
    pub activities: Vec<Activity>,
    /// Most recent activity by timestamp, when any exist.
    pub last_activity: Option<Activity>,
    /// Recent orders of the linked partner, capped to a small sample.
    pub partner_orders: Vec<Order>,
}

impl EnrichedLead {
    /// The sentinel-joined base record: the original lead with
    /// `Unknown` joins and empty embeddings.  Enrichment starts from
    /// this and overwrites only what actually matched, so a lead whose
    /// joins all miss is exactly this record.
    pub fn unenriched(lead: Lead) -> Self {
        Self {
            lead,
            funnel_name: UNKNOWN_NAME.into(),
            funnel_color: UNKNOWN_COLOR.into(),
            stage_name: UNKNOWN_NAME.into(),
            stage_order: 0,
            stage_color: UNKNOWN_COLOR.into(),
            funnel_stages: Vec::new(),
            partner: None,
            products: Vec::new(),
            activities: Vec::new(),
            last_activity: None,
            partner_orders: Vec::new(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Snapshot
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The aggregated, bounded view handed to the prompt composer.
///
/// `leads`/`partners`/`products`/`orders` are presentation slices; the
/// `total_*` fields carry the unbounded counts (server-reported where
/// the endpoint provides one).
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub user_name: String,
    pub leads: Vec<EnrichedLead>,
    pub funnels: Vec<Funnel>,
    pub stage_index: HashMap<String, Vec<Stage>>,
    pub partners: Vec<crate::entity::Partner>,
    pub products: Vec<CatalogProduct>,
    pub orders: Vec<Order>,
    pub total_leads: usize,
    pub total_partners: u64,
    pub total_products: u64,
    pub total_orders: usize,
}
