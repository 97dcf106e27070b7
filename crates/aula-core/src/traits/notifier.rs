//! UI notification (toast) capability.

use serde::{Deserialize, Serialize};

/// Toast severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    /// Positive confirmation.
    Success,
    /// Neutral information.
    Info,
    /// Something degraded but recoverable.
    Warning,
    /// An operation failed.
    Error,
}

/// A user-visible toast notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    /// Severity level.
    pub level: ToastLevel,
    /// Main toast text.
    pub title: String,
    /// Optional secondary line.
    pub description: Option<String>,
    /// Display duration in milliseconds.
    pub duration_ms: u64,
}

impl Toast {
    /// Build a toast with the given level and title.
    pub fn new(level: ToastLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
            duration_ms: 4000,
        }
    }

    /// Build a success toast.
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, title)
    }

    /// Build an info toast.
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, title)
    }

    /// Build a warning toast.
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, title)
    }

    /// Build an error toast.
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, title)
    }

    /// Attach a secondary line.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the display duration.
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Capability for surfacing toasts to the user.
pub trait UiNotifier: Send + Sync + std::fmt::Debug + 'static {
    /// Show a toast. Fire-and-forget.
    fn toast(&self, toast: Toast);
}
