//! Network status events.

use serde::{Deserialize, Serialize};

use crate::types::network::ConnectionQuality;

/// Events emitted by the network status monitor on transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetworkEvent {
    /// Connectivity was (re)established.
    Online,
    /// Connectivity was lost.
    Offline,
    /// Connection quality changed while staying online.
    QualityChanged {
        /// The new quality classification.
        quality: ConnectionQuality,
    },
}
