//! Endpoint backed by static configuration.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::{ChannelConfig, DeviceIdentity, Endpoint, PermissionStatus, Platform};

/// Endpoint description for hosts without a live device runtime.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_physical")]
    pub physical: bool,
    #[serde(default = "default_platform")]
    pub platform: Platform,
    #[serde(default)]
    pub permission: PermissionStatus,
    /// Status a permission request resolves to.
    #[serde(default = "default_grant_on_request")]
    pub grant_on_request: bool,
    pub device_id: String,
    pub app_id: String,
    pub native_token: String,
    #[serde(default)]
    pub development: bool,
}

fn default_physical() -> bool {
    true
}

fn default_platform() -> Platform {
    Platform::Android
}

fn default_grant_on_request() -> bool {
    true
}

/// Endpoint whose capabilities come from a [`DeviceConfig`].
pub struct ConfiguredEndpoint {
    physical: bool,
    platform: Platform,
    grant_on_request: bool,
    device: DeviceIdentity,
    permission: Mutex<PermissionStatus>,
    channels: Mutex<HashMap<String, ChannelConfig>>,
}

impl ConfiguredEndpoint {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            physical: config.physical,
            platform: config.platform,
            grant_on_request: config.grant_on_request,
            device: DeviceIdentity {
                device_id: config.device_id.clone(),
                app_id: config.app_id.clone(),
                native_token: config.native_token.clone(),
                development: config.development,
            },
            permission: Mutex::new(config.permission),
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Channel previously set up under `id`.
    pub fn channel(&self, id: &str) -> Option<ChannelConfig> {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn channel_count(&self) -> usize {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Endpoint for ConfiguredEndpoint {
    fn is_physical(&self) -> bool {
        self.physical
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn device(&self) -> &DeviceIdentity {
        &self.device
    }

    async fn permission_status(&self) -> color_eyre::eyre::Result<PermissionStatus> {
        Ok(*self.permission.lock().unwrap_or_else(PoisonError::into_inner))
    }

    async fn request_permission(&self) -> color_eyre::eyre::Result<PermissionStatus> {
        let mut permission = self.permission.lock().unwrap_or_else(PoisonError::into_inner);

        // A denied permission cannot be re-requested, only changed in settings.
        if *permission == PermissionStatus::Undetermined {
            *permission = if self.grant_on_request {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
        }

        Ok(*permission)
    }

    async fn ensure_channel(&self, channel: &ChannelConfig) -> color_eyre::eyre::Result<()> {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel.id.clone(), channel.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(permission: PermissionStatus, grant_on_request: bool) -> DeviceConfig {
        DeviceConfig {
            physical: true,
            platform: Platform::Android,
            permission,
            grant_on_request,
            device_id: "device-1".to_string(),
            app_id: "com.example.demo".to_string(),
            native_token: "native".to_string(),
            development: false,
        }
    }

    #[tokio::test]
    async fn test_request_resolves_undetermined() {
        let endpoint = ConfiguredEndpoint::new(&config(PermissionStatus::Undetermined, true));
        assert_eq!(
            endpoint.request_permission().await.unwrap(),
            PermissionStatus::Granted
        );
        assert_eq!(
            endpoint.permission_status().await.unwrap(),
            PermissionStatus::Granted
        );
    }

    #[tokio::test]
    async fn test_denied_stays_denied() {
        let endpoint = ConfiguredEndpoint::new(&config(PermissionStatus::Denied, true));
        assert_eq!(
            endpoint.request_permission().await.unwrap(),
            PermissionStatus::Denied
        );
    }

    #[tokio::test]
    async fn test_channel_setup_idempotent() {
        let endpoint = ConfiguredEndpoint::new(&config(PermissionStatus::Granted, true));
        let channel = ChannelConfig::default();

        endpoint.ensure_channel(&channel).await.unwrap();
        endpoint.ensure_channel(&channel).await.unwrap();

        assert_eq!(endpoint.channel_count(), 1);
        assert_eq!(endpoint.channel("default"), Some(channel));
    }
}
