//! REST implementation of the security settings gateway.

use async_trait::async_trait;

use aula_core::result::AppResult;
use aula_entity::settings::model::SecuritySetting;

use crate::client::ApiClient;
use crate::gateway::SecuritySettingsGateway;

/// Security settings gateway backed by the Aula REST API.
#[derive(Debug, Clone)]
pub struct HttpSecuritySettingsGateway {
    /// Shared REST client.
    client: ApiClient,
}

impl HttpSecuritySettingsGateway {
    /// Create a new settings gateway.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecuritySettingsGateway for HttpSecuritySettingsGateway {
    async fn security_settings(&self) -> AppResult<Vec<SecuritySetting>> {
        self.client.get_json("/api/security/settings").await
    }
}
