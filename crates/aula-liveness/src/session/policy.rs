//! Session timeout policy.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use aula_api::gateway::SecuritySettingsGateway;
use aula_entity::settings::model::SecuritySetting;

/// The effective idle timeout, fetched from the backend security
/// settings and cached in memory.
///
/// A fetch failure or an absent/invalid setting never blocks timeout
/// enforcement: the last known value (or the configured fallback)
/// stays in effect.
#[derive(Debug)]
pub struct TimeoutPolicy {
    /// Settings gateway.
    settings: Arc<dyn SecuritySettingsGateway>,
    /// Fallback timeout in minutes.
    fallback_minutes: u64,
    /// Cached timeout in minutes; `0` means "not fetched yet".
    cached_minutes: AtomicU64,
}

impl TimeoutPolicy {
    /// Create a new policy.
    pub fn new(settings: Arc<dyn SecuritySettingsGateway>, fallback_minutes: u64) -> Self {
        Self {
            settings,
            fallback_minutes,
            cached_minutes: AtomicU64::new(0),
        }
    }

    /// The effective timeout in minutes.
    pub fn current_minutes(&self) -> u64 {
        match self.cached_minutes.load(Ordering::SeqCst) {
            0 => self.fallback_minutes,
            minutes => minutes,
        }
    }

    /// The effective timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.current_minutes() * 60)
    }

    /// Re-fetch the timeout setting from the backend.
    pub async fn refresh(&self) -> u64 {
        match self.settings.security_settings().await {
            Ok(settings) => match SecuritySetting::session_timeout_minutes(&settings) {
                Some(minutes) if minutes > 0 => {
                    self.cached_minutes.store(minutes, Ordering::SeqCst);
                    minutes
                }
                _ => {
                    tracing::debug!(
                        "Session timeout setting absent or invalid, using {} minutes",
                        self.current_minutes()
                    );
                    self.current_minutes()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to fetch session timeout setting: {e}");
                self.current_minutes()
            }
        }
    }
}
