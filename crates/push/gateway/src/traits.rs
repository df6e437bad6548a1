//! Gateway traits.

use push_core::{GatewayResponse, PushMessage, TransportFailure};

/// Low-level push gateway: one HTTP call per recipient.
#[trait_variant::make(Send)]
pub trait Gateway: Send + Sync {
    /// Send one message, returning the raw response.
    async fn send(&self, message: &PushMessage<'_>) -> Result<GatewayResponse, TransportFailure>;
}
