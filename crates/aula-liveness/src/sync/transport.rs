//! Sync transports.
//!
//! The primary transport is a native broadcast fan-out. Where no
//! broadcast primitive is available, the storage relay falls back to
//! writing the serialized message under a shared key and riding the
//! store's change events; the write/delete pair is itself the "send",
//! nothing stays persisted.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use aula_core::config::sync::SyncConfig;
use aula_core::result::AppResult;

use super::message::SyncMessage;

/// Transport for relaying sync messages between instances.
///
/// Fire-and-forget: no retry, no ordering guarantee beyond the
/// transport's own delivery order. Lost and duplicate messages are
/// tolerated by design.
pub trait SyncTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Send a message to all instances sharing this transport.
    fn send(&self, message: &SyncMessage) -> AppResult<()>;

    /// Receiver of messages from all instances, the sender included.
    fn incoming(&self) -> broadcast::Receiver<SyncMessage>;
}

/// Native broadcast transport.
#[derive(Debug, Clone)]
pub struct BroadcastTransport {
    /// Shared fan-out channel.
    tx: broadcast::Sender<SyncMessage>,
}

impl BroadcastTransport {
    /// Create a new broadcast transport.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            tx: broadcast::channel(config.channel_buffer_size).0,
        }
    }
}

impl SyncTransport for BroadcastTransport {
    fn send(&self, message: &SyncMessage) -> AppResult<()> {
        // A send with no live receivers is not a failure.
        let _ = self.tx.send(message.clone());
        Ok(())
    }

    fn incoming(&self) -> broadcast::Receiver<SyncMessage> {
        self.tx.subscribe()
    }
}

/// A change observed in a [`SignalStore`].
#[derive(Debug, Clone)]
pub struct SignalChange {
    /// The key that changed.
    pub key: String,
    /// The new value; `None` for a removal.
    pub value: Option<String>,
}

/// Shared key/value store with change events, used as a signaling
/// channel of last resort.
pub trait SignalStore: Send + Sync + std::fmt::Debug + 'static {
    /// Write a value under a key.
    fn write(&self, key: &str, value: &str) -> AppResult<()>;

    /// Remove a key.
    fn remove(&self, key: &str) -> AppResult<()>;

    /// Receiver of change events for all keys.
    fn changes(&self) -> broadcast::Receiver<SignalChange>;
}

/// In-memory signal store.
#[derive(Debug)]
pub struct MemorySignalStore {
    /// Key → value.
    entries: DashMap<String, String>,
    /// Change fan-out.
    tx: broadcast::Sender<SignalChange>,
}

impl MemorySignalStore {
    /// Create a new in-memory signal store.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            entries: DashMap::new(),
            tx: broadcast::channel(buffer_size).0,
        }
    }
}

impl SignalStore for MemorySignalStore {
    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        let _ = self.tx.send(SignalChange {
            key: key.to_string(),
            value: Some(value.to_string()),
        });
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        let _ = self.tx.send(SignalChange {
            key: key.to_string(),
            value: None,
        });
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<SignalChange> {
        self.tx.subscribe()
    }
}

/// Fallback transport riding a [`SignalStore`]'s change events.
#[derive(Debug)]
pub struct StorageRelayTransport {
    /// Underlying store.
    store: Arc<dyn SignalStore>,
    /// Shared key the relay writes through.
    key: String,
    /// Fan-out of parsed incoming messages.
    out: broadcast::Sender<SyncMessage>,
    /// Cancels the forwarding task.
    cancel: CancellationToken,
}

impl StorageRelayTransport {
    /// Create a new relay over the given store and start forwarding
    /// change events for the configured key.
    pub fn new(store: Arc<dyn SignalStore>, config: &SyncConfig) -> Self {
        let out = broadcast::channel(config.channel_buffer_size).0;
        let cancel = CancellationToken::new();

        let key = config.storage_key.clone();
        let forward_key = key.clone();
        let forward_out = out.clone();
        let forward_cancel = cancel.clone();
        let mut changes = store.changes();

        tokio::spawn(async move {
            loop {
                let change = tokio::select! {
                    _ = forward_cancel.cancelled() => break,
                    change = changes.recv() => change,
                };

                match change {
                    Ok(change) => {
                        if change.key != forward_key {
                            continue;
                        }
                        // Removals are the cleanup half of a send.
                        let Some(value) = change.value else { continue };

                        match serde_json::from_str::<SyncMessage>(&value) {
                            Ok(message) => {
                                let _ = forward_out.send(message);
                            }
                            Err(e) => {
                                tracing::warn!("Discarding malformed sync message: {e}");
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!("Storage relay lagged, skipped {skipped} changes");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self {
            store,
            key,
            out,
            cancel,
        }
    }
}

impl SyncTransport for StorageRelayTransport {
    fn send(&self, message: &SyncMessage) -> AppResult<()> {
        let value = serde_json::to_string(message)?;
        self.store.write(&self.key, &value)?;
        self.store.remove(&self.key)?;
        Ok(())
    }

    fn incoming(&self) -> broadcast::Receiver<SyncMessage> {
        self.out.subscribe()
    }
}

impl Drop for StorageRelayTransport {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
