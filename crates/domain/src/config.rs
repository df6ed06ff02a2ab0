use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub crm: CrmConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_port")]
    pub port: u16,
    #[serde(default = "d_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: d_port(),
            host: d_host(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CRM backend connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Connection settings for the CRM data endpoints the snapshot is
/// aggregated from.  Timeouts live here — the fetch layer above never
/// models its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmConfig {
    #[serde(default = "d_crm_url")]
    pub base_url: String,
    #[serde(default = "d_timeout_ms")]
    pub timeout_ms: u64,
    /// Page size for the paged partner/product listings.
    #[serde(default = "d_page_size")]
    pub page_size: u32,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: d_crm_url(),
            timeout_ms: d_timeout_ms(),
            page_size: d_page_size(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "d_llm_url")]
    pub base_url: String,
    #[serde(default = "d_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    /// Output cap per response.  Kept low so answers stay direct and
    /// the stream finishes quickly.
    #[serde(default = "d_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "d_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: d_llm_url(),
            model: d_model(),
            api_key_env: d_api_key_env(),
            max_output_tokens: d_max_output_tokens(),
            timeout_secs: d_llm_timeout_secs(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Snapshot limits
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Presentation caps applied when the aggregated snapshot is built.
///
/// These bound the serialized prompt: the model's context budget is
/// finite and a handful of well-chosen records reads better than a
/// full dump.  Totals are always reported alongside the bounded lists
/// so the model knows how much data exists beyond the sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// How many leads are enriched and presented.
    #[serde(default = "d_lead_sample")]
    pub lead_sample: usize,
    /// Partner rows shown at catalog level.
    #[serde(default = "d_partner_limit")]
    pub partner_limit: usize,
    /// Product rows shown at catalog level.
    #[serde(default = "d_product_limit")]
    pub product_limit: usize,
    /// Order rows shown at catalog level.
    #[serde(default = "d_order_limit")]
    pub order_limit: usize,
    /// Recent orders embedded per enriched lead's partner.
    #[serde(default = "d_partner_order_limit")]
    pub partner_order_limit: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            lead_sample: d_lead_sample(),
            partner_limit: d_partner_limit(),
            product_limit: d_product_limit(),
            order_limit: d_order_limit(),
            partner_order_limit: d_partner_order_limit(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// serde default helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn d_port() -> u16 {
    5080
}
fn d_host() -> String {
    "127.0.0.1".into()
}
fn d_crm_url() -> String {
    "http://localhost:5000".into()
}
fn d_timeout_ms() -> u64 {
    8000
}
fn d_page_size() -> u32 {
    100
}
fn d_llm_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn d_model() -> String {
    "gemini-2.5-flash".into()
}
fn d_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn d_max_output_tokens() -> u32 {
    1024
}
fn d_llm_timeout_secs() -> u64 {
    120
}
fn d_lead_sample() -> usize {
    10
}
fn d_partner_limit() -> usize {
    15
}
fn d_product_limit() -> usize {
    15
}
fn d_order_limit() -> usize {
    10
}
fn d_partner_order_limit() -> usize {
    5
}
