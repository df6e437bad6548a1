//! Platform traits.

use push_core::RecipientToken;

use crate::ChannelConfig;

/// Mobile platform family of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Native push service name expected by the token issuer.
    pub fn push_type(self) -> &'static str {
        match self {
            Platform::Android => "fcm",
            Platform::Ios => "apns",
        }
    }
}

/// Delivery permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    #[default]
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

/// Native identity of an endpoint, exchanged for a gateway token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub app_id: String,
    pub native_token: String,
    pub development: bool,
}

/// Token issuance request sent on behalf of an endpoint.
#[derive(Debug, Clone, Copy)]
pub struct TokenRequest<'a> {
    pub project_id: &'a str,
    pub platform: Platform,
    pub device: &'a DeviceIdentity,
}

/// Endpoint capabilities: permission, channel setup and identity.
#[trait_variant::make(Send)]
pub trait Endpoint: Send + Sync {
    /// Whether this is a real device rather than a simulator.
    fn is_physical(&self) -> bool;

    /// Platform family.
    fn platform(&self) -> Platform;

    /// Native identity used for token issuance.
    fn device(&self) -> &DeviceIdentity;

    /// Current delivery permission.
    async fn permission_status(&self) -> color_eyre::eyre::Result<PermissionStatus>;

    /// Ask for delivery permission, returning the resulting status.
    async fn request_permission(&self) -> color_eyre::eyre::Result<PermissionStatus>;

    /// Create or update a delivery channel. Must be idempotent.
    async fn ensure_channel(&self, channel: &ChannelConfig) -> color_eyre::eyre::Result<()>;
}

/// Issues gateway tokens for endpoints.
#[trait_variant::make(Send)]
pub trait TokenIssuer: Send + Sync {
    /// Exchange a native identity for a gateway token.
    async fn issue_token(&self, request: &TokenRequest<'_>)
    -> color_eyre::eyre::Result<RecipientToken>;
}
