//! Client configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod backend;
pub mod logging;
pub mod network;
pub mod notifications;
pub mod routes;
pub mod session;
pub mod sync;

use serde::{Deserialize, Serialize};

use self::backend::BackendConfig;
use self::logging::LoggingConfig;
use self::network::NetworkConfig;
use self::notifications::NotificationsConfig;
use self::routes::RouteGuardConfig;
use self::session::SessionConfig;
use self::sync::SyncConfig;

use crate::error::AppError;

/// Root client configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay). Every
/// section has sensible defaults so an empty file is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Backend endpoint settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Session timeout enforcement settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Network status monitoring settings.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Notification feed settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Offline route guard settings.
    #[serde(default)]
    pub route_guard: RouteGuardConfig,
    /// Cross-instance sync settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `AULA_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("AULA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
