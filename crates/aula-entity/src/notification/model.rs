//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aula_core::types::id::{NotificationId, UserId};

use super::kind::{NotificationKind, NotificationSeverity};

/// A notification delivered to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Display severity.
    pub severity: NotificationSeverity,
    /// Kind of event this notification reports.
    pub kind: NotificationKind,
    /// Whether the user has read this notification.
    pub read: bool,
    /// Direct in-app route to open, when the producer supplied one.
    pub action_url: Option<String>,
    /// Additional structured data for action routing (JSON).
    pub action_data: Option<serde_json::Value>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When the notification was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Check if the notification has not been read yet.
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Category string used for toast-muting configuration.
    pub fn category(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Fields supplied by the caller when creating a notification; the
/// backend assigns the identifier and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// The recipient user.
    pub user_id: UserId,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Display severity.
    pub severity: NotificationSeverity,
    /// Kind of event this notification reports.
    pub kind: NotificationKind,
    /// Direct in-app route to open, when known.
    pub action_url: Option<String>,
    /// Additional structured data for action routing (JSON).
    pub action_data: Option<serde_json::Value>,
}
