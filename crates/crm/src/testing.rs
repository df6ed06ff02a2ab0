//! In-memory [`CrmFetch`] double and record builders shared by the
//! pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use sp_domain::entity::{
    Activity, AuthContext, CatalogProduct, Funnel, Lead, LeadProduct, Order, PagedCollection,
    Partner, Stage,
};

use crate::client::CrmFetch;

/// Canned-data fetch double.  Unregistered ids return the empty default,
/// which is also how an always-failing endpoint presents itself to the
/// pipeline.
#[derive(Default)]
pub struct MockCrm {
    pub leads: Vec<Lead>,
    pub funnels: Vec<Funnel>,
    pub stages: HashMap<String, Vec<Stage>>,
    pub partners: PagedCollection<Partner>,
    pub products: PagedCollection<CatalogProduct>,
    pub orders: Vec<Order>,
    pub orders_by_partner: HashMap<String, Vec<Order>>,
    pub activities: HashMap<String, Vec<Activity>>,
    pub lead_products: HashMap<String, Vec<LeadProduct>>,
    /// Counts calls to the partner-filtered order listing.
    pub partner_order_calls: AtomicUsize,
}

impl MockCrm {
    pub fn with_leads(mut self, leads: Vec<Lead>) -> Self {
        self.leads = leads;
        self
    }
    pub fn with_funnels(mut self, funnels: Vec<Funnel>) -> Self {
        self.funnels = funnels;
        self
    }
    pub fn with_stages(mut self, funnel_id: &str, stages: Vec<Stage>) -> Self {
        self.stages.insert(funnel_id.into(), stages);
        self
    }
    pub fn with_partners(mut self, partners: Vec<Partner>, total: Option<u64>) -> Self {
        self.partners = PagedCollection {
            items: partners,
            total,
        };
        self
    }
    pub fn with_products(mut self, products: Vec<CatalogProduct>, total: Option<u64>) -> Self {
        self.products = PagedCollection {
            items: products,
            total,
        };
        self
    }
    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders = orders;
        self
    }
    pub fn with_partner_orders(mut self, partner_id: &str, orders: Vec<Order>) -> Self {
        self.orders_by_partner.insert(partner_id.into(), orders);
        self
    }
    pub fn with_activities(mut self, lead_id: &str, activities: Vec<Activity>) -> Self {
        self.activities.insert(lead_id.into(), activities);
        self
    }
    pub fn with_lead_products(mut self, lead_id: &str, products: Vec<LeadProduct>) -> Self {
        self.lead_products.insert(lead_id.into(), products);
        self
    }
}

#[async_trait]
impl CrmFetch for MockCrm {
    async fn leads(&self, _auth: &AuthContext) -> Vec<Lead> {
        self.leads.clone()
    }

    async fn funnels(&self, _auth: &AuthContext) -> Vec<Funnel> {
        self.funnels.clone()
    }

    async fn funnel_stages(&self, funnel_id: &str, _auth: &AuthContext) -> Vec<Stage> {
        self.stages.get(funnel_id).cloned().unwrap_or_default()
    }

    async fn partners(&self, _auth: &AuthContext) -> PagedCollection<Partner> {
        PagedCollection {
            items: self.partners.items.clone(),
            total: self.partners.total,
        }
    }

    async fn catalog_products(&self, _auth: &AuthContext) -> PagedCollection<CatalogProduct> {
        PagedCollection {
            items: self.products.items.clone(),
            total: self.products.total,
        }
    }

    async fn orders(&self, partner_id: Option<&str>, _auth: &AuthContext) -> Vec<Order> {
        match partner_id {
            Some(pid) => {
                self.partner_order_calls.fetch_add(1, Ordering::SeqCst);
                self.orders_by_partner.get(pid).cloned().unwrap_or_default()
            }
            None => self.orders.clone(),
        }
    }

    async fn lead_activities(&self, lead_id: &str, _auth: &AuthContext) -> Vec<Activity> {
        self.activities.get(lead_id).cloned().unwrap_or_default()
    }

    async fn lead_products(&self, lead_id: &str, _auth: &AuthContext) -> Vec<LeadProduct> {
        self.lead_products.get(lead_id).cloned().unwrap_or_default()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Record builders
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn lead(id: &str, name: &str, funnel_id: &str, stage_id: &str) -> Lead {
    Lead {
        id: id.into(),
        name: name.into(),
        value: Some(1000.0),
        due_date: None,
        funnel_id: funnel_id.into(),
        stage_id: stage_id.into(),
        partner_id: None,
    }
}

pub fn funnel(id: &str, name: &str) -> Funnel {
    Funnel {
        id: id.into(),
        name: name.into(),
        color: "#3366ff".into(),
    }
}

pub fn stage(id: &str, name: &str, order: i32) -> Stage {
    Stage {
        id: id.into(),
        name: name.into(),
        order,
        color: "#22aa55".into(),
    }
}

pub fn partner(id: &str, name: &str) -> Partner {
    Partner {
        id: id.into(),
        name: name.into(),
        document: None,
        city: Some("Springfield".into()),
        active: true,
    }
}

pub fn product(id: &str, description: &str, stock: f64) -> CatalogProduct {
    CatalogProduct {
        id: id.into(),
        description: description.into(),
        stock,
    }
}

pub fn lead_product(id: &str, description: &str, quantity: f64, active: bool) -> LeadProduct {
    LeadProduct {
        product_id: id.into(),
        description: description.into(),
        quantity,
        unit_value: Some(10.0),
        total_value: Some(10.0 * quantity),
        active,
    }
}

pub fn activity(kind: &str, at: DateTime<Utc>) -> Activity {
    Activity {
        kind: kind.into(),
        description: Some(format!("{kind} with the customer")),
        timestamp: at,
        status: Some("done".into()),
        color: None,
    }
}

pub fn order(number: &str, value: f64) -> Order {
    Order {
        number: number.into(),
        value: Some(value),
        date: Some("2026-08-01".into()),
        salesperson: Some("Dana".into()),
    }
}

pub fn ts(h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 20, h, 0, 0).unwrap()
}
