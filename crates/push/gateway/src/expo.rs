//! Expo push gateway client using reqwest.

use std::time::Duration;

use color_eyre::eyre::WrapErr as _;
use push_core::{GatewayResponse, PushMessage, TransportFailure};
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE};

use crate::Gateway;

/// Gateway connection settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GatewayConfig {
    /// Push send endpoint.
    #[serde(default = "default_url")]
    pub url: String,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum concurrent sends within one dispatch.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Optional access token for projects with enhanced push security.
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_url() -> String {
    "https://exp.host/--/api/v2/push/send".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    4
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            access_token: None,
        }
    }
}

/// Sends push messages to the Expo push API over HTTP.
pub struct ExpoGateway {
    client: reqwest::Client,
    url: String,
    access_token: Option<String>,
}

impl ExpoGateway {
    /// Create a gateway client from config.
    pub fn new(config: &GatewayConfig) -> color_eyre::eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .wrap_err("failed to create gateway HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
            access_token: config.access_token.clone(),
        })
    }
}

impl Gateway for ExpoGateway {
    async fn send(&self, message: &PushMessage<'_>) -> Result<GatewayResponse, TransportFailure> {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(ACCEPT_ENCODING, "gzip, deflate")
            .json(message);

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(transport_failure)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_failure)?;

        tracing::debug!(status, body = %body, "gateway response");

        Ok(GatewayResponse { status, body })
    }
}

fn transport_failure(e: reqwest::Error) -> TransportFailure {
    if e.is_timeout() {
        TransportFailure("request timed out".to_string())
    } else if e.is_connect() {
        TransportFailure(format!("connection failed: {e}"))
    } else {
        TransportFailure(e.to_string())
    }
}
