//! Notification entity and action routing.

pub mod kind;
pub mod model;
pub mod routing;

pub use kind::{NotificationKind, NotificationSeverity};
pub use model::Notification;
