use std::sync::Arc;

use crate::config::Config;
use crate::interview::compliance::Denylist;
use crate::llm_client::LlmClient;
use crate::search::SearchProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Pluggable search backend. Default: WebSearchClient when
    /// SEARCH_ENDPOINT is set, NullSearchProvider otherwise.
    pub search: Arc<dyn SearchProvider>,
    pub config: Config,
    /// Protected-characteristic filter applied to every interviewer turn.
    pub denylist: Arc<Denylist>,
}
