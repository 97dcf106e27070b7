//! Offline route guarding.
//!
//! Prevents navigation to routes that cannot work offline, for the
//! configured roles, redirecting to a designated offline-capable
//! route instead.

pub mod guard;
pub mod pattern;

pub use guard::OfflineRouteGuard;
pub use pattern::{is_allowed_offline, match_route};
