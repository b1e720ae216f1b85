//! Shared data types for the Raven chat backend
//!
//! Message and channel records as the backend returns them, plus the request
//! bodies and response envelopes the client sends and receives.

pub mod messages;
pub mod types;

pub use messages::*;
pub use types::*;
