//! Cross-instance sync configuration.

use serde::{Deserialize, Serialize};

/// Cross-instance session sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Internal buffer size for the broadcast transport.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Shared storage key used by the storage-relay fallback transport.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            storage_key: default_storage_key(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_storage_key() -> String {
    "session-sync".to_string()
}
