//! Credential Validator.
//!
//! Two sequential probes per credential: an auth check against
//! `GET /auth/key`, then a minimal chat completion against a randomly chosen
//! free model. The verdict is a plain boolean; the reason lives in the log,
//! always with the credential masked.

use std::time::Duration;

use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::{RateLimitPolicy, ValidatorConfig};
use crate::http::{self, AUTH_TIMEOUT, CHAT_TIMEOUT};
use crate::keys;

/// Wire shape of a successful chat completion. Only the presence of a
/// non-empty `choices` array matters for the verdict.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<serde_json::Value>,
}

/// Best-effort shape of a provider error body.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Validator for single credentials.
#[derive(Debug)]
pub struct KeyValidator {
    client: Client,
    auth_url: String,
    chat_url: String,
    intra_request_delay: Duration,
    max_retries: u32,
    rate_limit_policy: RateLimitPolicy,
}

impl KeyValidator {
    /// Create a validator bound to the configured API base path.
    #[must_use]
    pub fn new(client: Client, config: &ValidatorConfig) -> Self {
        let base = config.base_url.trim_end_matches('/');
        Self {
            client,
            auth_url: format!("{base}/auth/key"),
            chat_url: format!("{base}/chat/completions"),
            intra_request_delay: config.intra_request_delay(),
            max_retries: config.max_retries,
            rate_limit_policy: config.rate_limit_policy,
        }
    }

    /// Probe one credential and return its verdict.
    ///
    /// The auth probe gates the chat probe: a credential that fails auth is
    /// never sent to the completions endpoint. An empty free-model list makes
    /// every verdict false since functional access cannot be proven.
    pub async fn validate<R: Rng>(
        &self,
        key: &str,
        free_models: &[String],
        rng: &mut R,
    ) -> bool {
        let masked = keys::mask(key);

        if !self.auth_probe(key, &masked).await {
            return false;
        }

        if free_models.is_empty() {
            tracing::warn!("key {masked}: skipping chat probe, no free models available");
            return false;
        }

        if !self.intra_request_delay.is_zero() {
            tokio::time::sleep(self.intra_request_delay).await;
        }

        let model = &free_models[rng.gen_range(0..free_models.len())];
        self.chat_probe(key, &masked, model).await
    }

    /// First probe: does the key authenticate at all?
    async fn auth_probe(&self, key: &str, masked: &str) -> bool {
        let response = match http::get_with_retry(
            &self.client,
            &self.auth_url,
            Some(key),
            AUTH_TIMEOUT,
            self.max_retries,
        )
        .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("key {masked}: auth check failed: {e}");
                return false;
            }
        };

        if response.status().is_success() {
            tracing::info!("key {masked}: auth check passed");
            true
        } else {
            tracing::error!("key {masked}: auth check failed: HTTP {}", response.status());
            false
        }
    }

    /// Second probe: can the key actually run a completion?
    async fn chat_probe(&self, key: &str, masked: &str, model: &str) -> bool {
        tracing::info!("key {masked}: chat probe with model '{model}'");

        let payload = serde_json::json!({
            "model": model,
            "messages": [{"role": "user", "content": "Hi"}],
            "max_tokens": 10,
        });

        // Not retried: a completion request is not idempotent.
        let response = match self
            .client
            .post(&self.chat_url)
            .timeout(CHAT_TIMEOUT)
            .bearer_auth(key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let e = http::map_transport_error(&e, CHAT_TIMEOUT);
                tracing::error!("key {masked}: chat probe failed: {e}");
                return false;
            }
        };

        match response.status() {
            status if status.is_success() => match response.json::<ChatResponse>().await {
                Ok(body) if !body.choices.is_empty() => {
                    tracing::info!("key {masked}: chat probe succeeded with '{model}'");
                    true
                }
                Ok(_) => {
                    tracing::error!("key {masked}: chat response has no choices");
                    false
                }
                Err(e) => {
                    tracing::error!("key {masked}: cannot parse chat response: {e}");
                    false
                }
            },
            StatusCode::PAYMENT_REQUIRED => {
                tracing::error!("key {masked}: insufficient balance (402)");
                false
            }
            StatusCode::TOO_MANY_REQUESTS => match self.rate_limit_policy {
                RateLimitPolicy::Optimistic => {
                    tracing::warn!("key {masked}: rate limited (429), counting as valid");
                    true
                }
                RateLimitPolicy::Conservative => {
                    tracing::warn!("key {masked}: rate limited (429), counting as invalid");
                    false
                }
            },
            status => {
                let message = provider_error_message(response).await;
                tracing::error!("key {masked}: chat probe failed: HTTP {status}{message}");
                false
            }
        }
    }
}

/// Extract `error.message` from a provider error body, best effort.
async fn provider_error_message(response: reqwest::Response) -> String {
    match response.json::<ApiErrorBody>().await {
        Ok(ApiErrorBody {
            error: Some(ApiErrorDetail {
                message: Some(message),
            }),
        }) => format!(" - {message}"),
        _ => String::new(),
    }
}
