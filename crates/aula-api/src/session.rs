//! REST implementation of the session-activity gateway.

use async_trait::async_trait;
use serde::Deserialize;

use aula_core::result::AppResult;

use crate::client::ApiClient;
use crate::gateway::SessionActivityGateway;

/// Session-activity gateway backed by the Aula REST API.
#[derive(Debug, Clone)]
pub struct HttpSessionActivityGateway {
    /// Shared REST client.
    client: ApiClient,
}

#[derive(Debug, Deserialize)]
struct ActivityResponse {
    updated: bool,
}

impl HttpSessionActivityGateway {
    /// Create a new session-activity gateway.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionActivityGateway for HttpSessionActivityGateway {
    async fn update_activity(&self, access_token: &str) -> AppResult<bool> {
        let response: ActivityResponse = self
            .client
            .post_json(
                "/api/sessions/activity",
                &serde_json::json!({ "session_token": access_token }),
            )
            .await?;
        Ok(response.updated)
    }
}
