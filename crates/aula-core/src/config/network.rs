//! Network status monitoring configuration.

use serde::{Deserialize, Serialize};

/// Network status monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Reachability probe targets, queried in parallel.
    #[serde(default = "default_probe_targets")]
    pub probe_targets: Vec<ProbeTarget>,
    /// Interval between periodic connectivity checks in seconds.
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    /// Debounce window for manual refresh requests in milliseconds.
    #[serde(default = "default_refresh_debounce")]
    pub refresh_debounce_ms: u64,
}

/// A single reachability probe target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeTarget {
    /// Endpoint URL, queried with `HEAD`. Response content is never read.
    pub url: String,
    /// Per-probe timeout in milliseconds.
    #[serde(default = "default_probe_timeout")]
    pub timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_targets: default_probe_targets(),
            check_interval_seconds: default_check_interval(),
            refresh_debounce_ms: default_refresh_debounce(),
        }
    }
}

fn default_probe_targets() -> Vec<ProbeTarget> {
    vec![
        ProbeTarget {
            url: "https://www.google.com/favicon.ico".to_string(),
            timeout_ms: 5000,
        },
        ProbeTarget {
            url: "https://www.cloudflare.com/favicon.ico".to_string(),
            timeout_ms: 3000,
        },
        ProbeTarget {
            url: "https://www.github.com/favicon.ico".to_string(),
            timeout_ms: 3000,
        },
    ]
}

fn default_check_interval() -> u64 {
    120
}

fn default_probe_timeout() -> u64 {
    3000
}

fn default_refresh_debounce() -> u64 {
    100
}
