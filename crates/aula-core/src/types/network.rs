//! Network status data types.
//!
//! A [`NetworkStatus`] value is recomputed on demand and superseded
//! entirely on each refresh; no history is kept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall connection quality classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionQuality {
    /// Fast connection, no restrictions expected.
    Excellent,
    /// Usable connection, some heavy operations may be slow.
    Good,
    /// Degraded connection, heavy operations should be avoided.
    Poor,
    /// No usable connection.
    Offline,
}

impl ConnectionQuality {
    /// String form used in logs and toasts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Poor => "poor",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for ConnectionQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Effective connection type reported by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectiveType {
    /// Very slow cellular-class link.
    Slow2g,
    /// Slow cellular-class link.
    TwoG,
    /// Medium cellular-class link.
    ThreeG,
    /// Fast link.
    FourG,
}

impl EffectiveType {
    /// Uppercase label for display, e.g. `"4G"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Slow2g => "SLOW-2G",
            Self::TwoG => "2G",
            Self::ThreeG => "3G",
            Self::FourG => "4G",
        }
    }
}

/// Raw connection details reported by the host environment, when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Effective connection type.
    pub effective_type: Option<EffectiveType>,
    /// Physical link kind, e.g. `"wifi"`, `"ethernet"`, `"cellular"`.
    pub link_type: Option<String>,
    /// Estimated downlink bandwidth in Mbps.
    pub downlink_mbps: Option<f64>,
    /// Estimated round-trip time in milliseconds.
    pub rtt_ms: Option<u32>,
    /// Whether the user has requested reduced data usage.
    pub save_data: Option<bool>,
}

/// A point-in-time snapshot of connectivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatus {
    /// Whether the client is actually online (probe-verified when possible).
    pub is_online: bool,
    /// Human-readable connection type, e.g. `"WiFi"` or `"Cellular (4G)"`.
    pub connection_type: String,
    /// Classified connection quality.
    pub quality: ConnectionQuality,
    /// Whether the connection is slow enough to degrade heavy features.
    pub is_slow: bool,
    /// When this snapshot was computed.
    pub last_checked: DateTime<Utc>,
    /// Raw connection details, when the host environment exposes them.
    pub connection: Option<ConnectionInfo>,
}

impl NetworkStatus {
    /// Initial snapshot before any probe has run.
    pub fn initial(native_flag: bool) -> Self {
        Self {
            is_online: native_flag,
            connection_type: "unknown".to_string(),
            quality: if native_flag {
                ConnectionQuality::Good
            } else {
                ConnectionQuality::Offline
            },
            is_slow: false,
            last_checked: Utc::now(),
            connection: None,
        }
    }
}
