//! REST implementation of the notification gateway.

use async_trait::async_trait;
use serde::Deserialize;

use aula_core::result::AppResult;
use aula_core::types::id::{NotificationId, UserId};
use aula_entity::notification::model::{NewNotification, Notification};

use crate::client::ApiClient;
use crate::gateway::NotificationGateway;

/// Notification gateway backed by the Aula REST API.
#[derive(Debug, Clone)]
pub struct HttpNotificationGateway {
    /// Shared REST client.
    client: ApiClient,
}

#[derive(Debug, Deserialize)]
struct UnreadCountResponse {
    count: u64,
}

impl HttpNotificationGateway {
    /// Create a new notification gateway.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationGateway for HttpNotificationGateway {
    async fn list(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        self.client
            .get_json(&format!("/api/notifications?user_id={user_id}"))
            .await
    }

    async fn unread_count(&self, user_id: UserId) -> AppResult<u64> {
        let response: UnreadCountResponse = self
            .client
            .get_json(&format!(
                "/api/notifications/unread-count?user_id={user_id}"
            ))
            .await?;
        Ok(response.count)
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<()> {
        self.client
            .post_empty(
                &format!("/api/notifications/{id}/read"),
                &serde_json::json!({ "user_id": user_id }),
            )
            .await
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<()> {
        self.client
            .post_empty(
                "/api/notifications/read-all",
                &serde_json::json!({ "user_id": user_id }),
            )
            .await
    }

    async fn delete(&self, id: NotificationId, user_id: UserId) -> AppResult<()> {
        self.client
            .delete(&format!("/api/notifications/{id}?user_id={user_id}"))
            .await
    }

    async fn clear_all(&self, user_id: UserId) -> AppResult<()> {
        self.client
            .delete(&format!("/api/notifications?user_id={user_id}"))
            .await
    }

    async fn create(&self, new: NewNotification) -> AppResult<Notification> {
        self.client.post_json("/api/notifications", &new).await
    }
}
