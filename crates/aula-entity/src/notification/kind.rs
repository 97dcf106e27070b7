//! Notification kind and severity enumerations.

use serde::{Deserialize, Serialize};

/// Display severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSeverity {
    /// Neutral information.
    Info,
    /// Positive confirmation.
    Success,
    /// Needs attention.
    Warning,
    /// Something failed.
    Error,
}

impl NotificationSeverity {
    /// Return the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for NotificationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of event a notification reports, used for action routing and
/// toast muting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new discussion was started in one of the user's courses.
    NewDiscussion,
    /// A new message or reply was posted in a discussion.
    NewMessage,
    /// An assignment was published.
    AssignmentCreated,
    /// An assignment deadline is approaching.
    AssignmentDue,
    /// Course content changed.
    CourseUpdate,
    /// A quiz submission was graded.
    QuizGraded,
    /// Platform maintenance announcement. Never surfaces a toast.
    SystemMaintenance,
    /// Any kind this client version does not recognize.
    #[serde(other)]
    Unknown,
}

impl NotificationKind {
    /// Return the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewDiscussion => "new_discussion",
            Self::NewMessage => "new_message",
            Self::AssignmentCreated => "assignment_created",
            Self::AssignmentDue => "assignment_due",
            Self::CourseUpdate => "course_update",
            Self::QuizGraded => "quiz_graded",
            Self::SystemMaintenance => "system_maintenance",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
