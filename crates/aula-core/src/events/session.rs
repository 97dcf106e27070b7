//! Session liveness events.

use serde::{Deserialize, Serialize};

/// Where a session event was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    /// Triggered by activity in this client instance.
    Local,
    /// Relayed from another instance of the same session.
    Remote,
}

/// Events emitted by the session timeout guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The idle clock was reset.
    Extended {
        /// Where the extension came from.
        origin: EventOrigin,
    },
    /// The session is about to expire.
    TimeoutWarning {
        /// Seconds remaining before sign-out.
        remaining_seconds: u64,
    },
    /// A previously raised warning no longer applies.
    WarningCleared,
    /// The idle timeout elapsed and the sign-out sequence ran.
    TimedOut {
        /// Where the timeout was first detected.
        origin: EventOrigin,
    },
}
