//! HTTP client utilities.
//!
//! One shared `reqwest` client serves all probes; timeouts are set per
//! request since the three endpoints have different budgets. Idempotent GETs
//! go through [`get_with_retry`], which retries transient failures with
//! exponential backoff before handing the response (or error) to the caller.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response};

use crate::error::{KeyvetError, Result};

/// Timeout for the auth-check probe.
pub const AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the models listing.
pub const MODELS_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for the chat-completion probe.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(20);

/// Statuses considered transient and worth retrying on GETs.
pub const RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Build the configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client() -> Result<Client> {
    ClientBuilder::new()
        .user_agent(format!("keyvet/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| KeyvetError::Network(e.to_string()))
}

/// Issue a GET, retrying transport errors and transient statuses.
///
/// Retries up to `max_retries` additional attempts with exponential backoff
/// (1s, 2s, 4s, ...). A response that is still a transient status after the
/// retry budget is returned as-is; status classification is the caller's job.
///
/// # Errors
///
/// Returns error when the final attempt fails at the transport level.
pub async fn get_with_retry(
    client: &Client,
    url: &str,
    bearer: Option<&str>,
    timeout: Duration,
    max_retries: u32,
) -> Result<Response> {
    let mut attempt = 0u32;
    loop {
        let mut request = client.get(url).timeout(timeout);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response)
                if attempt < max_retries
                    && RETRY_STATUSES.contains(&response.status().as_u16()) =>
            {
                tracing::debug!(
                    status = response.status().as_u16(),
                    attempt,
                    url,
                    "transient status, retrying"
                );
            }
            Ok(response) => return Ok(response),
            Err(e) if attempt < max_retries => {
                tracing::debug!(error = %e, attempt, url, "transport error, retrying");
            }
            Err(e) => return Err(map_transport_error(&e, timeout)),
        }

        tokio::time::sleep(backoff_delay(attempt)).await;
        attempt += 1;
    }
}

/// Map a reqwest error to the crate error type.
pub fn map_transport_error(e: &reqwest::Error, timeout: Duration) -> KeyvetError {
    if e.is_timeout() {
        KeyvetError::Timeout(timeout.as_secs())
    } else {
        KeyvetError::Network(e.to_string())
    }
}

/// Backoff before retry `attempt + 1`: 1s, 2s, 4s, ... capped at 64s.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(6))
}
