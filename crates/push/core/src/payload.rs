//! Notification payloads and the gateway wire message.

use serde_json::{Map, Value};

/// Largest encoded message (recipient excluded) the gateway accepts.
pub const MAX_PAYLOAD_BYTES: usize = 4096;

/// Sound played on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sound {
    #[default]
    Default,
    None,
}

impl Sound {
    fn wire_name(self) -> Option<&'static str> {
        match self {
            Sound::Default => Some("default"),
            Sound::None => None,
        }
    }
}

/// Rejected payload, raised before any recipient is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPayload {
    #[error("payload has no title, body or data")]
    Empty,
    #[error("payload is {size} bytes, gateway limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("payload could not be encoded: {0}")]
    Encoding(String),
}

/// Notification content sent to every recipient of a dispatch.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NotificationPayload {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    sound: Sound,
    #[serde(default)]
    data: Map<String, Value>,
}

impl NotificationPayload {
    /// Create a payload with the default sound and no data.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            sound: Sound::Default,
            data: Map::new(),
        }
    }

    /// Set the sound.
    pub fn with_sound(mut self, sound: Sound) -> Self {
        self.sound = sound;
        self
    }

    /// Add one data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Replace the data mapping.
    pub fn with_data_map(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn sound(&self) -> Sound {
        self.sound
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Check that the payload can be sent at all.
    pub fn validate(&self) -> Result<(), InvalidPayload> {
        if self.title.is_empty() && self.body.is_empty() && self.data.is_empty() {
            return Err(InvalidPayload::Empty);
        }

        let encoded = serde_json::to_vec(&self.message_for(""))
            .map_err(|e| InvalidPayload::Encoding(e.to_string()))?;
        if encoded.len() > MAX_PAYLOAD_BYTES {
            return Err(InvalidPayload::TooLarge {
                size: encoded.len(),
                limit: MAX_PAYLOAD_BYTES,
            });
        }

        Ok(())
    }

    /// Build the gateway message for one recipient.
    pub fn message_for<'a>(&'a self, to: &'a str) -> PushMessage<'a> {
        PushMessage {
            to,
            sound: self.sound.wire_name(),
            title: &self.title,
            body: &self.body,
            data: &self.data,
        }
    }
}

/// JSON body of one gateway send: `{ to, sound, title, body, data }`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PushMessage<'a> {
    pub to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<&'static str>,
    pub title: &'a str,
    pub body: &'a str,
    pub data: &'a Map<String, Value>,
}
