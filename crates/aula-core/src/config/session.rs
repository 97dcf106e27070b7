//! Session timeout enforcement configuration.

use serde::{Deserialize, Serialize};

/// Session inactivity enforcement configuration.
///
/// The effective timeout itself comes from the backend security settings
/// (`session_timeout_minutes`); `default_timeout_minutes` is the fallback
/// used when that setting is absent or cannot be fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interval between idle-time checks in seconds.
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    /// Fallback idle timeout in minutes.
    #[serde(default = "default_timeout_minutes")]
    pub default_timeout_minutes: u64,
    /// How long before the timeout the expiry warning is raised, in seconds.
    #[serde(default = "default_warning_lead")]
    pub warning_lead_seconds: u64,
    /// Interval between backend activity heartbeats in seconds.
    #[serde(default = "default_heartbeat_interval")]
    pub activity_heartbeat_seconds: u64,
    /// Grace delay before the timeout re-entrancy guard resets, in seconds.
    #[serde(default = "default_timeout_grace")]
    pub timeout_grace_seconds: u64,
    /// Route to navigate to after sign-out.
    #[serde(default = "default_login_route")]
    pub login_route: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            check_interval_seconds: default_check_interval(),
            default_timeout_minutes: default_timeout_minutes(),
            warning_lead_seconds: default_warning_lead(),
            activity_heartbeat_seconds: default_heartbeat_interval(),
            timeout_grace_seconds: default_timeout_grace(),
            login_route: default_login_route(),
        }
    }
}

fn default_check_interval() -> u64 {
    60
}

fn default_timeout_minutes() -> u64 {
    30
}

fn default_warning_lead() -> u64 {
    300
}

fn default_heartbeat_interval() -> u64 {
    300
}

fn default_timeout_grace() -> u64 {
    5
}

fn default_login_route() -> String {
    "/auth".to_string()
}
