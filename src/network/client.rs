//! Shared HTTP client construction and JSON request helpers

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::warn;

const USER_AGENT: &str = concat!("aegis-risk-oracle/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY_CHARS: usize = 320;

/// Builds a client with a bounded per-call deadline.
pub fn build_http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Sends a request and decodes a JSON body, turning non-2xx statuses into errors.
pub async fn send_json(request: RequestBuilder, context: &str) -> Result<serde_json::Value> {
    let response = request
        .send()
        .await
        .with_context(|| format!("{} request failed", context))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!("⚠️ {} returned error status {}: {}", context, status, truncate(&body, MAX_ERROR_BODY_CHARS));
        return Err(anyhow::anyhow!(
            "{} error: {} - {}",
            context,
            status,
            truncate(&body, MAX_ERROR_BODY_CHARS)
        ));
    }

    response
        .json()
        .await
        .with_context(|| format!("Failed to parse {} JSON response", context))
}

/// Truncates on a char boundary.
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
