//! Events observed on the endpoint.

use serde_json::{Map, Value};

/// Notification shown on this endpoint.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReceivedNotification {
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// User interaction with a received notification.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NotificationResponse {
    /// Tapped action, `"default"` for the notification itself.
    pub action_identifier: String,
    pub notification: ReceivedNotification,
}
