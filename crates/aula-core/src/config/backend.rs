//! Backend endpoint configuration.

use serde::{Deserialize, Serialize};

/// Backend API and realtime endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// WebSocket URL of the realtime service.
    #[serde(default = "default_realtime_url")]
    pub realtime_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            realtime_url: default_realtime_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_realtime_url() -> String {
    "ws://localhost:8080/realtime".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
