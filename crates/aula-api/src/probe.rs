//! HTTP reachability probe.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use aula_core::traits::probe::ConnectivityProbe;
use aula_core::types::network::ConnectionInfo;

/// Connectivity probe that issues `HEAD` requests against well-known
/// endpoints.
///
/// Any response at all counts as reachable; the status code and body
/// are irrelevant, the probe only tests that the host answered. The
/// native flag and connection info are pushed in by the host shell,
/// which hears about interface changes from the OS.
#[derive(Debug)]
pub struct HttpConnectivityProbe {
    /// HTTP client without a global timeout; each probe brings its own.
    http: reqwest::Client,
    /// Environment-reported online flag.
    native_flag: watch::Sender<bool>,
    /// Last connection details pushed by the host shell.
    connection_info: watch::Sender<Option<ConnectionInfo>>,
}

impl HttpConnectivityProbe {
    /// Create a new probe. The native flag starts `true` until the host
    /// shell reports otherwise.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            native_flag: watch::channel(true).0,
            connection_info: watch::channel(None).0,
        }
    }

    /// Update the environment-reported online flag.
    pub fn set_native_flag(&self, online: bool) {
        self.native_flag.send_replace(online);
    }

    /// Update the connection details.
    pub fn set_connection_info(&self, info: Option<ConnectionInfo>) {
        self.connection_info.send_replace(info);
    }
}

impl Default for HttpConnectivityProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectivityProbe for HttpConnectivityProbe {
    fn native_flag(&self) -> bool {
        *self.native_flag.borrow()
    }

    async fn probe(&self, target: &str, timeout: Duration) -> bool {
        let request = self.http.head(target).send();
        matches!(tokio::time::timeout(timeout, request).await, Ok(Ok(_)))
    }

    fn connection_info(&self) -> Option<ConnectionInfo> {
        self.connection_info.borrow().clone()
    }

    fn flag_changes(&self) -> watch::Receiver<bool> {
        self.native_flag.subscribe()
    }
}
