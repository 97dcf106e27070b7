//! Shared REST client for the Aula backend.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use aula_core::config::backend::BackendConfig;
use aula_core::error::AppError;
use aula_core::result::AppResult;
use aula_core::traits::auth::AuthState;

/// Thin wrapper around `reqwest::Client` with base URL, bearer
/// authentication from the auth state, and unified error mapping.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Underlying HTTP client.
    http: reqwest::Client,
    /// REST API base URL, without trailing slash.
    base_url: String,
    /// Auth state supplying the access token.
    auth: Arc<dyn AuthState>,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: &BackendConfig, auth: Arc<dyn AuthState>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self
            .request(reqwest::Method::GET, path)?
            .send()
            .await
            .map_err(|e| AppError::with_source(
                aula_core::error::ErrorKind::Network,
                format!("GET {path} failed: {e}"),
                e,
            ))?;

        Self::check_status(path, &response)?;
        response
            .json()
            .await
            .map_err(|e| AppError::backend(format!("GET {path}: invalid response body: {e}")))
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self
            .request(reqwest::Method::POST, path)?
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::with_source(
                aula_core::error::ErrorKind::Network,
                format!("POST {path} failed: {e}"),
                e,
            ))?;

        Self::check_status(path, &response)?;
        response
            .json()
            .await
            .map_err(|e| AppError::backend(format!("POST {path}: invalid response body: {e}")))
    }

    /// POST with no meaningful response body.
    pub async fn post_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AppResult<()> {
        let response = self
            .request(reqwest::Method::POST, path)?
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::with_source(
                aula_core::error::ErrorKind::Network,
                format!("POST {path} failed: {e}"),
                e,
            ))?;

        Self::check_status(path, &response)
    }

    /// DELETE a resource.
    pub async fn delete(&self, path: &str) -> AppResult<()> {
        let response = self
            .request(reqwest::Method::DELETE, path)?
            .send()
            .await
            .map_err(|e| AppError::with_source(
                aula_core::error::ErrorKind::Network,
                format!("DELETE {path} failed: {e}"),
                e,
            ))?;

        Self::check_status(path, &response)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> AppResult<reqwest::RequestBuilder> {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self.http.request(method, url);

        if let Some(token) = self.auth.access_token() {
            builder = builder.bearer_auth(token);
        }

        Ok(builder)
    }

    fn check_status(path: &str, response: &reqwest::Response) -> AppResult<()> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::not_found(format!("{path}: not found")));
        }
        if !status.is_success() {
            return Err(AppError::backend(format!(
                "{path}: backend returned {status}"
            )));
        }
        Ok(())
    }
}
