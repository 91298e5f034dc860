//! Web search capability, kept behind a trait so research
//! agents can be tested without network access.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API error (status {0})")]
    Api(u16),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub snippet: String,
}

/// The search seam. An empty hit list is a valid outcome, not an error;
/// research agents degrade to profile-only context when nothing is found.
///
/// Carried in `AppState` as `Arc<dyn SearchProvider>`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

/// HTTP search client against a configurable endpoint that answers
/// `GET {endpoint}?q={query}` with a JSON array of `{url, snippet}`.
pub struct WebSearchClient {
    client: reqwest::Client,
    endpoint: String,
}

impl WebSearchClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            endpoint,
        }
    }
}

#[async_trait]
impl SearchProvider for WebSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Api(status.as_u16()));
        }

        let hits: Vec<SearchHit> = response.json().await?;
        debug!("Search returned {} hits", hits.len());
        Ok(hits)
    }
}

/// No-op provider used when no search endpoint is configured. Always returns
/// zero hits, which downstream treats as valid absence of results.
pub struct NullSearchProvider;

#[async_trait]
impl SearchProvider for NullSearchProvider {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
        Ok(Vec::new())
    }
}

/// Renders hits into the source block handed to a research agent.
pub fn render_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|h| format!("- {} — {}", h.url, h.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}
