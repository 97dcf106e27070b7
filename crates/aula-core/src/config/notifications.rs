//! Notification feed configuration.

use serde::{Deserialize, Serialize};

/// Notification feed and realtime channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Maximum realtime reconnect attempts before falling back to polling.
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
    /// Base reconnect delay in milliseconds. Doubles on each attempt.
    #[serde(default = "default_reconnect_base_delay")]
    pub reconnect_base_delay_ms: u64,
    /// Polling interval in seconds once realtime retries are exhausted.
    #[serde(default = "default_polling_interval")]
    pub polling_interval_seconds: u64,
    /// Notification categories that never surface a toast.
    #[serde(default = "default_muted_categories")]
    pub muted_categories: Vec<String>,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: default_max_reconnect_attempts(),
            reconnect_base_delay_ms: default_reconnect_base_delay(),
            polling_interval_seconds: default_polling_interval(),
            muted_categories: default_muted_categories(),
        }
    }
}

fn default_max_reconnect_attempts() -> u32 {
    3
}

fn default_reconnect_base_delay() -> u64 {
    1000
}

fn default_polling_interval() -> u64 {
    30
}

fn default_muted_categories() -> Vec<String> {
    vec!["system_maintenance".to_string()]
}
