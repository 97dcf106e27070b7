//! Cross-instance sync message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aula_core::types::id::ClientId;

/// Kind of session event relayed between instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncEventKind {
    /// The session idle clock was reset.
    SessionExtended,
    /// The session timed out and the instance signed out.
    SessionTimeout,
}

impl SyncEventKind {
    /// String form used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionExtended => "SESSION_EXTENDED",
            Self::SessionTimeout => "SESSION_TIMEOUT",
        }
    }
}

impl std::fmt::Display for SyncEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message relayed between instances.
///
/// Ephemeral: created on broadcast, consumed once by listeners, never
/// persisted. The sender id lets an instance discard its own
/// broadcasts on receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncMessage {
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: SyncEventKind,
    /// When the message was sent (milliseconds since the epoch on the wire).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// The instance that sent the message.
    pub sender: ClientId,
}

impl SyncMessage {
    /// Stamp a new message from the given sender.
    pub fn now(kind: SyncEventKind, sender: ClientId) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            sender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let message = SyncMessage::now(SyncEventKind::SessionExtended, ClientId::new());
        let json = serde_json::to_string(&message).expect("serialize");
        assert!(json.contains("\"SESSION_EXTENDED\""));

        let parsed: SyncMessage = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.kind, message.kind);
        assert_eq!(parsed.sender, message.sender);
    }
}
