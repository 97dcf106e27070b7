//! Typed client events.
//!
//! Each concern (session liveness, network status) emits its own event
//! enum through an explicit channel; consumers hold owned receivers
//! rather than registering anonymous callbacks.

pub mod network;
pub mod session;

pub use network::NetworkEvent;
pub use session::{EventOrigin, SessionEvent};
