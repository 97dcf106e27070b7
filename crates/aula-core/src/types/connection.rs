//! Connection lifecycle state for long-lived subscriptions.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a long-lived connection (realtime channel or
/// session guard loop).
///
/// Valid transitions: `Disconnected → Connecting → Connected`, `Error`
/// reachable from `Connecting`, and `Polling` entered after the bounded
/// retry count is exhausted. A fresh instance always starts
/// `Disconnected`; no state survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No connection attempt has been made, or the connection was torn down.
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// The realtime path is live.
    Connected,
    /// The last connection attempt failed; a retry may be pending.
    Error,
    /// Degraded mode: realtime retries exhausted, fixed-interval polling.
    Polling,
}

impl ConnectionState {
    /// Whether a transition from `self` to `next` is part of the lifecycle.
    pub fn can_transition(&self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Error)
                | (Error, Connecting)
                | (Error, Polling)
                | (Connected, Error)
                | (Connected, Connecting)
                | (Connected, Disconnected)
                | (Polling, Connecting)
                | (Polling, Disconnected)
                | (Connecting, Disconnected)
                | (Error, Disconnected)
        )
    }

    /// Whether updates are flowing in this state (live or degraded).
    pub fn is_delivering(&self) -> bool {
        matches!(self, Self::Connected | Self::Polling)
    }

    /// The state reported to the UI.
    ///
    /// Polling is a transparent degradation, not a user-visible failure,
    /// so it is reported as `Connected`.
    pub fn reported(&self) -> ConnectionState {
        match self {
            Self::Polling => Self::Connected,
            other => *other,
        }
    }

    /// String form used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
            Self::Polling => "polling",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_transitions() {
        use ConnectionState::*;
        assert!(Disconnected.can_transition(Connecting));
        assert!(Connecting.can_transition(Connected));
        assert!(Connecting.can_transition(Error));
        assert!(Error.can_transition(Polling));
        assert!(!Disconnected.can_transition(Connected));
        assert!(!Polling.can_transition(Error));
    }

    #[test]
    fn test_polling_reported_as_connected() {
        assert_eq!(
            ConnectionState::Polling.reported(),
            ConnectionState::Connected
        );
        assert_eq!(
            ConnectionState::Error.reported(),
            ConnectionState::Error
        );
    }
}
