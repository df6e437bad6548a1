//! Push Dispatch
//!
//! Sends notification payloads to batches of recipients through the push gateway.

mod dispatcher;
mod expo;
mod service;
mod traits;

pub use dispatcher::*;
pub use expo::*;
pub use service::*;
pub use traits::*;

// Re-export for convenience
pub use push_core;
pub use push_registrar;
