/// Upstream job API client — the only code that talks to the scraping service.
///
/// One request per search, 30 second timeout, no retries. Non-2xx responses are
/// surfaced with the upstream status and its body so the caller can relay both.
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::jobs::filters::UpstreamParams;

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned status {status}")]
    Status { status: u16, body: Value },
}

/// Source of raw job listings. `AppState` carries one only when an API key is configured.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn search(&self, params: &UpstreamParams) -> Result<Value, UpstreamError>;
}

#[derive(Clone)]
pub struct ScrapingdogClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ScrapingdogClient {
    pub fn new(endpoint: String, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .context("Failed to build job API HTTP client")?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl JobSource for ScrapingdogClient {
    async fn search(&self, params: &UpstreamParams) -> Result<Value, UpstreamError> {
        info!(api_key = "***", ?params, "Scrapingdog GET /jobs");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Relay JSON bodies as-is, anything else as a string.
            let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // A 2xx without a JSON body (HTML interstitial, empty 204) carries no listings.
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(body) => body,
            Err(e) => {
                warn!("Scrapingdog returned {status} with a non-JSON body: {e}");
                Value::Null
            }
        };
        debug!(
            "Scrapingdog returned {} bytes (array: {})",
            text.len(),
            body.is_array()
        );
        Ok(body)
    }
}
