//! Expo token issuance using reqwest.

use std::time::Duration;

use color_eyre::eyre::WrapErr as _;
use push_core::RecipientToken;

use crate::{RegistrationConfig, TokenIssuer, TokenRequest};

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueBody<'a> {
    #[serde(rename = "type")]
    push_type: &'static str,
    device_id: &'a str,
    development: bool,
    app_id: &'a str,
    device_token: &'a str,
    project_id: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct IssueReply {
    data: IssueData,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueData {
    expo_push_token: String,
}

/// Exchanges native device tokens for Expo push tokens.
pub struct ExpoTokenIssuer {
    client: reqwest::Client,
    url: String,
}

impl ExpoTokenIssuer {
    pub fn new(config: &RegistrationConfig) -> color_eyre::eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .wrap_err("failed to create token issuer HTTP client")?;

        Ok(Self {
            client,
            url: config.token_url.clone(),
        })
    }
}

impl TokenIssuer for ExpoTokenIssuer {
    async fn issue_token(
        &self,
        request: &TokenRequest<'_>,
    ) -> color_eyre::eyre::Result<RecipientToken> {
        let body = IssueBody {
            push_type: request.platform.push_type(),
            device_id: &request.device.device_id,
            development: request.device.development,
            app_id: &request.device.app_id,
            device_token: &request.device.native_token,
            project_id: request.project_id,
        };

        let reply: IssueReply = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .wrap_err("token request failed")?
            .error_for_status()
            .wrap_err("token request rejected")?
            .json()
            .await
            .wrap_err("invalid token response")?;

        RecipientToken::new(reply.data.expo_push_token).wrap_err("issuer returned an empty token")
    }
}
