//! REST fetch layer for the CRM data endpoints.
//!
//! [`RestCrmClient`] wraps a `reqwest::Client` and translates every
//! [`CrmFetch`] method into one HTTP GET against the CRM backend.  This
//! is the sole partial-failure boundary of the pipeline: a transport
//! error, a non-2xx status, or a body that doesn't match the expected
//! shape all collapse into the empty default for that endpoint.  Nothing
//! above this layer ever sees a fetch error, so each entity source fails
//! independently of its siblings.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use sp_domain::config::CrmConfig;
use sp_domain::entity::{
    Activity, AuthContext, CatalogProduct, Funnel, Lead, LeadProduct, Order, PagedCollection,
    Partner, Stage,
};
use sp_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Fetch trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One method per collaborator endpoint the aggregator consumes.
///
/// Implementations absorb failure: every method returns the declared
/// empty default instead of erroring, per-endpoint.  The trait is the
/// seam the pipeline is tested through.
#[async_trait]
pub trait CrmFetch: Send + Sync {
    async fn leads(&self, auth: &AuthContext) -> Vec<Lead>;
    async fn funnels(&self, auth: &AuthContext) -> Vec<Funnel>;
    async fn funnel_stages(&self, funnel_id: &str, auth: &AuthContext) -> Vec<Stage>;
    async fn partners(&self, auth: &AuthContext) -> PagedCollection<Partner>;
    async fn catalog_products(&self, auth: &AuthContext) -> PagedCollection<CatalogProduct>;
    /// Order listing, optionally filtered to one partner.
    async fn orders(&self, partner_id: Option<&str>, auth: &AuthContext) -> Vec<Order>;
    async fn lead_activities(&self, lead_id: &str, auth: &AuthContext) -> Vec<Activity>;
    async fn lead_products(&self, lead_id: &str, auth: &AuthContext) -> Vec<LeadProduct>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// REST client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Created once and reused for the lifetime of the gateway process.
/// The underlying `reqwest::Client` maintains a connection pool; the
/// configured timeout is the only timeout in the pipeline.
#[derive(Debug, Clone)]
pub struct RestCrmClient {
    http: Client,
    base_url: String,
    page_size: u32,
}

impl RestCrmClient {
    pub fn new(cfg: &CrmConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            page_size: cfg.page_size,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the internal auth headers derived from the threaded
    /// [`AuthContext`].  The CRM endpoints are internal collaborators
    /// that trust these headers; the session cookie never travels past
    /// the gateway.
    fn decorate(&self, rb: RequestBuilder, auth: &AuthContext) -> RequestBuilder {
        rb.header("X-User-Id", auth.user_id.to_string())
            .header("X-User-Name", &auth.user_name)
    }

    /// GET a path and return the parsed JSON body, or `None` on any
    /// transport error, non-2xx status, or unparseable body.
    async fn get_value(&self, path: &str, auth: &AuthContext) -> Option<Value> {
        let url = self.url(path);
        let resp = match self.decorate(self.http.get(&url), auth).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "CRM fetch failed, using default");
                return None;
            }
        };

        if !resp.status().is_success() {
            tracing::warn!(
                path = %path,
                status = resp.status().as_u16(),
                "CRM fetch returned non-success, using default"
            );
            return None;
        }

        match resp.json::<Value>().await {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "CRM body unparseable, using default");
                None
            }
        }
    }

    /// Fetch an endpoint that yields a bare collection.  Any shape
    /// deviation is "no data", not a parse error.
    async fn get_collection<T: DeserializeOwned>(&self, path: &str, auth: &AuthContext) -> Vec<T> {
        let Some(value) = self.get_value(path, auth).await else {
            return Vec::new();
        };

        match serde_json::from_value::<Vec<T>>(value) {
            Ok(items) => items,
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "CRM collection shape mismatch");
                Vec::new()
            }
        }
    }

    /// Fetch a paged endpoint.  The body may be a bare array or an
    /// object wrapping the collection under `key` plus an optional
    /// `total` count; both parse, anything else is "no data".
    async fn get_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        auth: &AuthContext,
    ) -> PagedCollection<T> {
        match self.get_value(path, auth).await {
            Some(value) => coerce_paged(value, key),
            None => PagedCollection::default(),
        }
    }
}

/// Coerce a paged-endpoint body into a [`PagedCollection`].
///
/// Accepted shapes: a bare array, or an object with the collection under
/// `key` and an optional numeric `total`.  Everything else is "no data".
fn coerce_paged<T: DeserializeOwned>(value: Value, key: &str) -> PagedCollection<T> {
    let (list, total) = match value {
        Value::Array(_) => (value, None),
        Value::Object(ref map) => {
            let total = map.get("total").and_then(Value::as_u64);
            match map.get(key) {
                Some(list @ Value::Array(_)) => (list.clone(), total),
                _ => return PagedCollection::default(),
            }
        }
        _ => return PagedCollection::default(),
    };

    match serde_json::from_value::<Vec<T>>(list) {
        Ok(items) => PagedCollection { items, total },
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "CRM paged shape mismatch");
            PagedCollection::default()
        }
    }
}

#[async_trait]
impl CrmFetch for RestCrmClient {
    async fn leads(&self, auth: &AuthContext) -> Vec<Lead> {
        self.get_collection("/api/leads", auth).await
    }

    async fn funnels(&self, auth: &AuthContext) -> Vec<Funnel> {
        self.get_collection("/api/funnels", auth).await
    }

    async fn funnel_stages(&self, funnel_id: &str, auth: &AuthContext) -> Vec<Stage> {
        let path = format!("/api/funnels/stages?funnelId={funnel_id}");
        self.get_collection(&path, auth).await
    }

    async fn partners(&self, auth: &AuthContext) -> PagedCollection<Partner> {
        let path = format!("/api/erp/partners?page=1&pageSize={}", self.page_size);
        self.get_paged(&path, "partners", auth).await
    }

    async fn catalog_products(&self, auth: &AuthContext) -> PagedCollection<CatalogProduct> {
        let path = format!("/api/erp/products?page=1&pageSize={}", self.page_size);
        self.get_paged(&path, "products", auth).await
    }

    async fn orders(&self, partner_id: Option<&str>, auth: &AuthContext) -> Vec<Order> {
        let path = match partner_id {
            Some(pid) => format!("/api/erp/orders?partnerId={pid}&userId={}", auth.user_id),
            None => format!("/api/erp/orders?userId={}", auth.user_id),
        };
        self.get_collection(&path, auth).await
    }

    async fn lead_activities(&self, lead_id: &str, auth: &AuthContext) -> Vec<Activity> {
        let path = format!("/api/leads/activities?leadId={lead_id}");
        self.get_collection(&path, auth).await
    }

    async fn lead_products(&self, lead_id: &str, auth: &AuthContext) -> Vec<LeadProduct> {
        let path = format!("/api/leads/products?leadId={lead_id}");
        self.get_collection(&path, auth).await
    }
}
