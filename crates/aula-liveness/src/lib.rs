//! # aula-liveness
//!
//! Client liveness & coordination layer for Aula. Provides:
//!
//! - Cross-instance session sync over a pluggable transport
//! - Network status monitoring with parallel reachability probes
//! - Session inactivity enforcement synchronized across instances
//! - A realtime notification feed with reconnect backoff and a
//!   transparent polling fallback
//! - Offline route guarding for configurable roles
//!
//! Everything here is explicitly constructed and dependency-injected;
//! there are no process-wide singletons. Background loops take a
//! `CancellationToken` and must leave no timers or tasks behind once
//! it fires.

pub mod network;
pub mod notify;
pub mod route;
pub mod runtime;
pub mod session;
pub mod sync;

pub use network::monitor::NetworkMonitor;
pub use runtime::{LivenessRuntime, RuntimeServices};
pub use notify::center::NotificationCenter;
pub use notify::channel::RealtimeFeed;
pub use route::guard::OfflineRouteGuard;
pub use session::guard::SessionTimeoutGuard;
pub use sync::service::SessionSync;
