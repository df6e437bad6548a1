//! Delivery channel settings.

/// Channel importance, highest to lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Max,
    High,
    Default,
    Low,
    Min,
}

/// Delivery channel configuration (Android notification channel).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub importance: Importance,
    /// Alternating wait/vibrate durations in milliseconds.
    pub vibration_pattern: Vec<u64>,
    /// `#AARRGGBB`
    pub light_color: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            name: "default".to_string(),
            importance: Importance::Max,
            vibration_pattern: vec![0, 250, 250, 250],
            light_color: "#FF231F7C".to_string(),
        }
    }
}
