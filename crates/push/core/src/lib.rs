//! Push Core Types
//!
//! Data model, wire format and response classification for push dispatch.

mod classify;
mod events;
mod outcome;
mod payload;
mod token;

pub use classify::*;
pub use events::*;
pub use outcome::*;
pub use payload::*;
pub use token::*;
