//! Connectivity probe capability.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::types::network::ConnectionInfo;

/// Capability for asking the host environment about connectivity.
///
/// The native flag is the environment's self-reported online state; it
/// can be wrong in both directions, which is why the monitor also runs
/// reachability probes and lets the probe result win.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync + std::fmt::Debug + 'static {
    /// The environment's self-reported online flag.
    fn native_flag(&self) -> bool;

    /// Probe a single target for reachability.
    ///
    /// Returns `true` only if the target answered within `timeout`.
    /// Failures (network error, timeout, blocked request) are silent:
    /// the probe simply found nothing.
    async fn probe(&self, target: &str, timeout: Duration) -> bool;

    /// Raw connection details, when the environment exposes them.
    fn connection_info(&self) -> Option<ConnectionInfo>;

    /// Receiver tracking changes of the native flag.
    fn flag_changes(&self) -> watch::Receiver<bool>;
}
