//! Push Registration
//!
//! Obtains the push token identifying this endpoint to the gateway.

mod channel;
mod endpoint;
mod events;
mod expo;
mod registrar;
mod traits;

pub use channel::*;
pub use endpoint::*;
pub use events::*;
pub use expo::*;
pub use registrar::*;
pub use traits::*;
