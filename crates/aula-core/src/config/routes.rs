//! Offline route guard configuration.

use serde::{Deserialize, Serialize};

/// Offline route protection configuration.
///
/// Route patterns support `:param` segments, e.g.
/// `/dashboard/courses/:id/content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteGuardConfig {
    /// Routes that remain usable while offline.
    #[serde(default = "default_allowed_routes")]
    pub allowed_offline_routes: Vec<String>,
    /// Route to redirect to when the current route is unavailable offline.
    #[serde(default = "default_redirect_route")]
    pub redirect_route: String,
    /// User roles the restriction applies to.
    #[serde(default = "default_enabled_roles")]
    pub enabled_roles: Vec<String>,
    /// Delay before redirecting, in milliseconds, so the toast can render.
    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_ms: u64,
}

impl Default for RouteGuardConfig {
    fn default() -> Self {
        Self {
            allowed_offline_routes: default_allowed_routes(),
            redirect_route: default_redirect_route(),
            enabled_roles: default_enabled_roles(),
            redirect_delay_ms: default_redirect_delay(),
        }
    }
}

fn default_allowed_routes() -> Vec<String> {
    vec![
        "/dashboard/offline-learning".to_string(),
        "/dashboard/courses/:id/content".to_string(),
    ]
}

fn default_redirect_route() -> String {
    "/dashboard/offline-learning".to_string()
}

fn default_enabled_roles() -> Vec<String> {
    vec!["student".to_string()]
}

fn default_redirect_delay() -> u64 {
    500
}
