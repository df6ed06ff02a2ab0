use std::sync::Arc;

use sp_crm::CrmFetch;
use sp_domain::config::Config;
use sp_providers::LlmProvider;

/// Shared application state passed to all API handlers.
///
/// Both collaborators sit behind their trait seams so the handlers can
/// be exercised with scripted doubles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub crm: Arc<dyn CrmFetch>,
    pub llm: Arc<dyn LlmProvider>,
}
