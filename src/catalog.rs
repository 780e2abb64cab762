//! Model Catalog Fetcher.
//!
//! Fetches the provider's model listing once per process and caches the
//! free-tier subset. Every failure mode (transport, bad status, malformed
//! JSON, missing `data`) degrades to an empty list; the orchestrator treats
//! an empty cache as "chat probing unavailable".

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::error::{KeyvetError, Result};
use crate::http::{self, MODELS_TIMEOUT};

/// Marker substring identifying free-tier model identifiers.
pub const FREE_MODEL_MARKER: &str = ":free";

/// Wire shape of the models listing. Records are kept loose on purpose:
/// entries that are not objects or lack a string `id` are skipped, not fatal.
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    data: Option<Vec<serde_json::Value>>,
}

/// Memoizing fetcher for the free-model list.
#[derive(Debug)]
pub struct ModelCatalog {
    client: Client,
    models_url: String,
    max_retries: u32,
    cache: OnceCell<Vec<String>>,
}

impl ModelCatalog {
    /// Create a catalog for the given API base path.
    #[must_use]
    pub fn new(client: Client, base_url: &str, max_retries: u32) -> Self {
        Self {
            client,
            models_url: format!("{}/models", base_url.trim_end_matches('/')),
            max_retries,
            cache: OnceCell::new(),
        }
    }

    /// Return the cached free-model list, fetching it on first use.
    ///
    /// An empty slice means the catalog is unavailable for this run.
    pub async fn free_models(&self) -> &[String] {
        self.cache.get_or_init(|| self.fetch()).await
    }

    async fn fetch(&self) -> Vec<String> {
        tracing::info!("fetching model listing from {}", self.models_url);

        let free = match self.try_fetch().await {
            Ok(free) => free,
            Err(e) => {
                tracing::error!("model listing failed: {e}");
                Vec::new()
            }
        };

        if free.is_empty() {
            tracing::warn!("no free models found; chat probing is unavailable");
        } else {
            tracing::info!("found {} free model(s)", free.len());
        }
        free
    }

    /// Fetch and filter the listing. Failures come back typed so the caller
    /// can log one line and degrade to an empty cache.
    async fn try_fetch(&self) -> Result<Vec<String>> {
        let response = http::get_with_retry(
            &self.client,
            &self.models_url,
            None,
            MODELS_TIMEOUT,
            self.max_retries,
        )
        .await?;

        if !response.status().is_success() {
            return Err(KeyvetError::Network(format!(
                "HTTP {} from {}",
                response.status(),
                self.models_url
            )));
        }

        let parsed: ModelsResponse = response
            .json()
            .await
            .map_err(|e| KeyvetError::ParseResponse(e.to_string()))?;

        let records = parsed.data.ok_or_else(|| {
            KeyvetError::ParseResponse("model listing has no data field".to_string())
        })?;

        Ok(records
            .iter()
            .filter_map(|record| record.get("id").and_then(serde_json::Value::as_str))
            .filter(|id| id.contains(FREE_MODEL_MARKER))
            .map(ToString::to_string)
            .collect())
    }
}
