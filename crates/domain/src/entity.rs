//! Typed CRM entity records.
//!
//! Every upstream collection is modeled as an explicit struct with named,
//! typed fields.  Upstream stores are loose about scalar types (numeric
//! ids sometimes arrive as strings, active flags as `"S"`/`"N"`), so the
//! id and flag fields use lenient deserializers that normalize both
//! encodings.  All records are read-only to this pipeline.

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lenient scalar deserializers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Accept an id encoded as a JSON string or number.
pub fn de_id<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    let v = serde_json::Value::deserialize(de)?;
    match v {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Like [`de_id`] but for optional fields; null and absent both map to `None`.
pub fn de_opt_id<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let v = Option::<serde_json::Value>::deserialize(de)?;
    Ok(match v {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept an active flag encoded as a bool or as `"S"`/`"N"`/`"Y"`/`"1"`.
pub fn de_flag<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
    let v = serde_json::Value::deserialize(de)?;
    Ok(match v {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => matches!(s.as_str(), "S" | "s" | "Y" | "y" | "1" | "true"),
        serde_json::Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Records
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A sales opportunity.  Owned by the upstream lead store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    /// Monetary value of the opportunity, when known.
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(deserialize_with = "de_id")]
    pub funnel_id: String,
    #[serde(deserialize_with = "de_id")]
    pub stage_id: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub partner_id: Option<String>,
}

/// Immutable reference data for the duration of one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funnel {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// One stage of a funnel.  Ordering by `order` is the business ordering;
/// ties are left in fetch order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub active: bool,
}

/// A catalog-level product (not linked to any lead).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub stock: f64,
}

/// A product linked to a lead.  Only active links are surfaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadProduct {
    #[serde(deserialize_with = "de_id")]
    pub product_id: String,
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_value: Option<f64>,
    #[serde(default)]
    pub total_value: Option<f64>,
    #[serde(default, deserialize_with = "de_flag")]
    pub active: bool,
}

/// An interaction recorded against exactly one lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A sales order, associated with exactly one partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(deserialize_with = "de_id")]
    pub number: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub salesperson: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Paged wrapper
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// What a paged listing endpoint yields: one page of items plus the
/// server-reported total when the endpoint provides one.
#[derive(Debug, Clone)]
pub struct PagedCollection<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
}

impl<T> Default for PagedCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: None,
        }
    }
}

impl<T> PagedCollection<T> {
    /// The authoritative total: server-reported when present, else the
    /// length of the fetched page.
    pub fn effective_total(&self) -> u64 {
        self.total.unwrap_or(self.items.len() as u64)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Auth context
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The internal identity a request acts as, threaded explicitly through
/// the fetch layer.  Parsing session cookies (or whatever transport
/// encoding) happens once at the API boundary; nothing below this type
/// ever sees a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub user_name: String,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self {
            user_id: 0,
            user_name: "User".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_id_accepts_number() {
        let lead: Lead = serde_json::from_str(
            r#"{"id": 42, "name": "Acme deal", "funnelId": "1", "stageId": 3}"#,
        )
        .unwrap();
        assert_eq!(lead.id, "42");
        assert_eq!(lead.stage_id, "3");
        assert!(lead.partner_id.is_none());
    }

    #[test]
    fn partner_flag_accepts_legacy_encoding() {
        let p: Partner =
            serde_json::from_str(r#"{"id": "7", "name": "Globex", "active": "S"}"#).unwrap();
        assert!(p.active);
        let p: Partner =
            serde_json::from_str(r#"{"id": "7", "name": "Globex", "active": "N"}"#).unwrap();
        assert!(!p.active);
        let p: Partner =
            serde_json::from_str(r#"{"id": "7", "name": "Globex", "active": true}"#).unwrap();
        assert!(p.active);
    }

    #[test]
    fn paged_effective_total_prefers_server_value() {
        let page = PagedCollection {
            items: vec![1, 2, 3],
            total: Some(30),
        };
        assert_eq!(page.effective_total(), 30);

        let page = PagedCollection {
            items: vec![1, 2, 3],
            total: None,
        };
        assert_eq!(page.effective_total(), 3);
    }
}
