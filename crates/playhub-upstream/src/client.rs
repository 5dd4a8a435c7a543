//! HTTP client for the platform backend.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use playhub_core::config::upstream::UpstreamConfig;
use playhub_core::error::AppError;
use playhub_core::result::AppResult;

use super::sealer::PayloadSealer;

/// Request body posted upstream: the sealed JSON and nothing else.
#[derive(Debug, Serialize)]
struct SealedRequest {
    sign: String,
}

/// Posts sealed JSON to the platform backend.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    sealer: Option<PayloadSealer>,
}

impl UpstreamClient {
    /// Creates a client from configuration.
    ///
    /// An empty `public_key` yields a client whose posts fail with a
    /// configuration error; a malformed one fails here.
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let sealer = if config.public_key.trim().is_empty() {
            warn!("upstream.public_key is empty; upstream posts will fail");
            None
        } else {
            Some(PayloadSealer::from_pem(&config.public_key)?)
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            sealer,
        })
    }

    /// Full URL for `api_path`.
    pub fn url(&self, api_path: &str) -> String {
        format!("{}/{}", self.base_url, api_path.trim_start_matches('/'))
    }

    /// Posts `body` to `api_path` and returns the raw response body.
    ///
    /// The body is serialised, sealed to the backend's public key and sent
    /// as `{"sign": ...}` with the `apiKey` header set.
    pub async fn post(&self, api_path: &str, body: &Value) -> AppResult<String> {
        let url = self.url(api_path);
        let sealer = self
            .sealer
            .as_ref()
            .ok_or_else(|| AppError::configuration("upstream.public_key is not configured"))?;
        let data = serde_json::to_string(body)?;
        let request = SealedRequest {
            sign: sealer.seal(&data)?,
        };

        debug!(url = %url, data = %data, "Upstream request");

        let response = self
            .http
            .post(&url)
            .header("apiKey", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Upstream request failed");
                AppError::external_service(format!("POST {url} failed: {e}"))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!(url = %url, error = %e, "Failed to read upstream response");
            AppError::external_service(format!("Reading response from {url} failed: {e}"))
        })?;

        if !status.is_success() {
            warn!(url = %url, status = %status, "Upstream returned non-success status");
        }
        debug!(url = %url, status = %status, body = %text, "Upstream response");

        Ok(text)
    }
}
