//! Backend gateway traits.
//!
//! Implemented by the REST clients in this crate and by in-memory
//! fakes in tests.

use async_trait::async_trait;

use aula_core::result::AppResult;
use aula_core::types::id::{NotificationId, UserId};
use aula_entity::notification::model::{NewNotification, Notification};
use aula_entity::settings::model::SecuritySetting;

/// Gateway for the per-user notification collection.
#[async_trait]
pub trait NotificationGateway: Send + Sync + std::fmt::Debug + 'static {
    /// List the user's notifications, newest first.
    async fn list(&self, user_id: UserId) -> AppResult<Vec<Notification>>;

    /// Count the user's unread notifications.
    async fn unread_count(&self, user_id: UserId) -> AppResult<u64>;

    /// Mark one notification as read.
    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<()>;

    /// Mark all of the user's notifications as read.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<()>;

    /// Delete one notification.
    async fn delete(&self, id: NotificationId, user_id: UserId) -> AppResult<()>;

    /// Delete all of the user's notifications.
    async fn clear_all(&self, user_id: UserId) -> AppResult<()>;

    /// Create a notification; the backend assigns id and timestamps.
    async fn create(&self, new: NewNotification) -> AppResult<Notification>;
}

/// Gateway for admin-maintained security settings.
#[async_trait]
pub trait SecuritySettingsGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch the full key/value security settings list.
    async fn security_settings(&self) -> AppResult<Vec<SecuritySetting>>;
}

/// Gateway for the session-activity heartbeat.
#[async_trait]
pub trait SessionActivityGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Persist "last active now" for the session behind `access_token`.
    ///
    /// Returns `false` if the backend no longer knows the session.
    async fn update_activity(&self, access_token: &str) -> AppResult<bool>;
}
