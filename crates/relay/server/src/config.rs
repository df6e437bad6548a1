use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use push_gateway::GatewayConfig;
use push_registrar::{DeviceConfig, RegistrationConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config file not found at {0}")]
    NotFound(PathBuf),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    #[serde(default)]
    pub gateway: GatewayConfig,
    pub registration: RegistrationConfig,
    pub device: DeviceConfig,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `RELAY_CONFIG`, or `relay.toml` in the working directory.
    pub fn config_path() -> PathBuf {
        std::env::var_os("RELAY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("relay.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.registration.project_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "registration.project_id must be set".to_string(),
            ));
        }
        if self.gateway.url.is_empty() {
            return Err(ConfigError::Invalid("gateway.url must be set".to_string()));
        }
        Ok(())
    }
}
