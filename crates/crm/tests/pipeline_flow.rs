//! Integration tests for the aggregation pipeline — full round-trip
//! without a CRM backend.
//!
//! These tests validate the complete snapshot flow across modules
//! (client trait + stages + enrich + aggregate) against an in-memory
//! fetch implementation. All tests are pure and deterministic.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use sp_crm::{aggregate, CrmFetch};
use sp_domain::config::SnapshotConfig;
use sp_domain::entity::*;

/// A small but fully populated CRM: two funnels, three leads, one
/// partner with orders, activities and product links on the first lead.
struct FixtureCrm;

fn fixture_lead(id: &str, name: &str, funnel: &str, stage: &str, partner: Option<&str>) -> Lead {
    Lead {
        id: id.into(),
        name: name.into(),
        value: Some(2500.0),
        due_date: Some("2026-09-15".into()),
        funnel_id: funnel.into(),
        stage_id: stage.into(),
        partner_id: partner.map(Into::into),
    }
}

#[async_trait]
impl CrmFetch for FixtureCrm {
    async fn leads(&self, _auth: &AuthContext) -> Vec<Lead> {
        vec![
            fixture_lead("10", "Acme renewal", "f1", "s2", Some("p1")),
            fixture_lead("11", "Globex upsell", "f1", "s1", None),
            fixture_lead("12", "Initech intro", "f2", "s9", None),
        ]
    }

    async fn funnels(&self, _auth: &AuthContext) -> Vec<Funnel> {
        vec![
            Funnel {
                id: "f1".into(),
                name: "Sales".into(),
                color: "#3366ff".into(),
            },
            Funnel {
                id: "f2".into(),
                name: "Renewal".into(),
                color: "#ff6633".into(),
            },
        ]
    }

    async fn funnel_stages(&self, funnel_id: &str, _auth: &AuthContext) -> Vec<Stage> {
        match funnel_id {
            "f1" => vec![
                Stage {
                    id: "s1".into(),
                    name: "Contact".into(),
                    order: 1,
                    color: "#aaa".into(),
                },
                Stage {
                    id: "s2".into(),
                    name: "Proposal".into(),
                    order: 2,
                    color: "#bbb".into(),
                },
            ],
            // f2's stage endpoint "fails": empty default.
            _ => Vec::new(),
        }
    }

    async fn partners(&self, _auth: &AuthContext) -> PagedCollection<Partner> {
        PagedCollection {
            items: vec![Partner {
                id: "p1".into(),
                name: "Acme Corp".into(),
                document: Some("12.345.678/0001-00".into()),
                city: Some("Porto Alegre".into()),
                active: true,
            }],
            total: Some(44),
        }
    }

    async fn catalog_products(&self, _auth: &AuthContext) -> PagedCollection<CatalogProduct> {
        let items = (0..20)
            .map(|i| CatalogProduct {
                id: format!("pr{i}"),
                description: format!("Product {i}"),
                stock: 10.0 + i as f64,
            })
            .collect();
        PagedCollection { items, total: None }
    }

    async fn orders(&self, partner_id: Option<&str>, _auth: &AuthContext) -> Vec<Order> {
        let count = match partner_id {
            Some("p1") => 7,
            Some(_) => 0,
            None => 12,
        };
        (0..count)
            .map(|i| Order {
                number: format!("ord-{i}"),
                value: Some(100.0 * (i + 1) as f64),
                date: Some("2026-08-10".into()),
                salesperson: Some("Dana".into()),
            })
            .collect()
    }

    async fn lead_activities(&self, lead_id: &str, _auth: &AuthContext) -> Vec<Activity> {
        if lead_id != "10" {
            return Vec::new();
        }
        let at = |h| Utc.with_ymd_and_hms(2026, 8, 20, h, 0, 0).unwrap();
        vec![
            Activity {
                kind: "call".into(),
                description: None,
                timestamp: at(9),
                status: Some("done".into()),
                color: None,
            },
            Activity {
                kind: "meeting".into(),
                description: Some("on-site demo".into()),
                timestamp: at(16),
                status: Some("done".into()),
                color: None,
            },
        ]
    }

    async fn lead_products(&self, lead_id: &str, _auth: &AuthContext) -> Vec<LeadProduct> {
        if lead_id != "10" {
            return Vec::new();
        }
        vec![
            LeadProduct {
                product_id: "pr1".into(),
                description: "Product 1".into(),
                quantity: 3.0,
                unit_value: Some(50.0),
                total_value: Some(150.0),
                active: true,
            },
            LeadProduct {
                product_id: "pr2".into(),
                description: "Discontinued".into(),
                quantity: 1.0,
                unit_value: None,
                total_value: None,
                active: false,
            },
        ]
    }
}

fn limits() -> SnapshotConfig {
    SnapshotConfig::default()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Full snapshot round-trip
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn snapshot_joins_and_bounds_hold_together() {
    let snap = aggregate(&FixtureCrm, &AuthContext::default(), "Dana", None, &limits())
        .await
        .expect("snapshot");

    // Sample order follows fetch order.
    let ids: Vec<_> = snap.leads.iter().map(|l| l.lead.id.as_str()).collect();
    assert_eq!(ids, ["10", "11", "12"]);

    // Lead 10: fully joined.
    let acme = &snap.leads[0];
    assert_eq!(acme.funnel_name, "Sales");
    assert_eq!(acme.stage_name, "Proposal");
    assert_eq!(acme.stage_order, 2);
    assert_eq!(acme.funnel_stages.len(), 2);
    assert_eq!(acme.partner.as_ref().unwrap().name, "Acme Corp");
    assert_eq!(acme.last_activity.as_ref().unwrap().kind, "meeting");
    // Inactive link filtered, partner orders capped to 5 of 7.
    assert_eq!(acme.products.len(), 1);
    assert_eq!(acme.partner_orders.len(), 5);

    // Lead 12 points into f2, whose stage list came back empty.
    let initech = &snap.leads[2];
    assert_eq!(initech.funnel_name, "Renewal");
    assert_eq!(initech.stage_name, "Unknown");
    assert_eq!(initech.stage_order, 0);
    assert!(initech.funnel_stages.is_empty());

    // Stage index has one entry per funnel even when a fetch failed.
    assert_eq!(snap.stage_index.len(), 2);
    assert!(snap.stage_index["f2"].is_empty());

    // Bounds and totals.
    assert_eq!(snap.total_leads, 3);
    assert_eq!(snap.total_partners, 44);
    assert_eq!(snap.products.len(), 15);
    assert_eq!(snap.total_products, 20);
    assert_eq!(snap.orders.len(), 10);
    assert_eq!(snap.total_orders, 12);
}

#[tokio::test]
async fn focused_lead_is_presented_separately_not_sampled() {
    let snap = aggregate(
        &FixtureCrm,
        &AuthContext::default(),
        "Dana",
        Some("10"),
        &limits(),
    )
    .await
    .expect("snapshot");

    let ids: Vec<_> = snap.leads.iter().map(|l| l.lead.id.as_str()).collect();
    assert_eq!(ids, ["11", "12"]);
    // Totals still count the focused lead.
    assert_eq!(snap.total_leads, 3);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Degraded backends
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Every endpoint "fails" (returns the empty default, which is how the
/// fetch layer presents failure).
struct DeadCrm;

#[async_trait]
impl CrmFetch for DeadCrm {
    async fn leads(&self, _auth: &AuthContext) -> Vec<Lead> {
        Vec::new()
    }
    async fn funnels(&self, _auth: &AuthContext) -> Vec<Funnel> {
        Vec::new()
    }
    async fn funnel_stages(&self, _funnel_id: &str, _auth: &AuthContext) -> Vec<Stage> {
        Vec::new()
    }
    async fn partners(&self, _auth: &AuthContext) -> PagedCollection<Partner> {
        PagedCollection::default()
    }
    async fn catalog_products(&self, _auth: &AuthContext) -> PagedCollection<CatalogProduct> {
        PagedCollection::default()
    }
    async fn orders(&self, _partner_id: Option<&str>, _auth: &AuthContext) -> Vec<Order> {
        Vec::new()
    }
    async fn lead_activities(&self, _lead_id: &str, _auth: &AuthContext) -> Vec<Activity> {
        Vec::new()
    }
    async fn lead_products(&self, _lead_id: &str, _auth: &AuthContext) -> Vec<LeadProduct> {
        Vec::new()
    }
}

#[tokio::test]
async fn fully_dead_backend_still_yields_an_empty_snapshot() {
    let snap = aggregate(&DeadCrm, &AuthContext::default(), "Dana", None, &limits())
        .await
        .expect("snapshot");

    assert!(snap.leads.is_empty());
    assert_eq!(snap.total_leads, 0);
    assert_eq!(snap.total_partners, 0);
    assert!(snap.stage_index.is_empty());
}
