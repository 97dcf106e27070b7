//! Cross-instance sync service.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use aula_core::result::AppResult;
use aula_core::types::id::ClientId;

use super::message::{SyncEventKind, SyncMessage};
use super::transport::SyncTransport;

/// Callback invoked for each received message of a subscribed kind.
pub type SyncListener = Box<dyn Fn(&SyncMessage) -> AppResult<()> + Send + Sync>;

struct ListenerEntry {
    id: u64,
    callback: SyncListener,
}

type ListenerMap = DashMap<SyncEventKind, Vec<ListenerEntry>>;

/// Relays typed session events to all *other* instances of the same
/// origin.
///
/// Explicitly constructed and injected, one instance per tab/window;
/// there is no process-wide singleton. Messages stamped with this instance's
/// [`ClientId`] are discarded on receipt so a sender never reacts to
/// its own broadcast.
pub struct SessionSync {
    /// This instance's identity.
    client_id: ClientId,
    /// Underlying transport.
    transport: Arc<dyn SyncTransport>,
    /// Kind → registered listeners.
    listeners: Arc<ListenerMap>,
    /// Monotonic listener id source.
    next_listener_id: AtomicU64,
    /// Cancels the dispatch task.
    cancel: CancellationToken,
}

impl SessionSync {
    /// Create a new sync service and start dispatching incoming
    /// messages.
    pub fn new(transport: Arc<dyn SyncTransport>) -> Self {
        let client_id = ClientId::new();
        let listeners: Arc<ListenerMap> = Arc::new(DashMap::new());
        let cancel = CancellationToken::new();

        let dispatch_listeners = Arc::clone(&listeners);
        let dispatch_cancel = cancel.clone();
        let mut incoming = transport.incoming();

        tokio::spawn(async move {
            loop {
                let message = tokio::select! {
                    _ = dispatch_cancel.cancelled() => break,
                    message = incoming.recv() => message,
                };

                match message {
                    Ok(message) => {
                        if message.sender == client_id {
                            tracing::trace!("Ignoring own {} broadcast", message.kind);
                            continue;
                        }
                        dispatch(&dispatch_listeners, &message);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!("Sync dispatch lagged, skipped {skipped} messages");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self {
            client_id,
            transport,
            listeners,
            next_listener_id: AtomicU64::new(0),
            cancel,
        }
    }

    /// This instance's identity.
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Broadcast an event to all other instances.
    ///
    /// Fire-and-forget: a transport failure degrades to a logged no-op.
    pub fn broadcast(&self, kind: SyncEventKind) {
        let message = SyncMessage::now(kind, self.client_id);
        if let Err(e) = self.transport.send(&message) {
            tracing::warn!("Failed to broadcast {kind}: {e}");
        }
    }

    /// Register a listener for one event kind.
    ///
    /// The returned subscription owns the registration; dropping it
    /// unregisters the listener.
    pub fn subscribe(
        &self,
        kind: SyncEventKind,
        callback: impl Fn(&SyncMessage) -> AppResult<()> + Send + Sync + 'static,
    ) -> SyncSubscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.entry(kind).or_default().push(ListenerEntry {
            id,
            callback: Box::new(callback),
        });

        SyncSubscription {
            id,
            kind,
            listeners: Arc::clone(&self.listeners),
        }
    }
}

fn dispatch(listeners: &ListenerMap, message: &SyncMessage) {
    let Some(entries) = listeners.get(&message.kind) else {
        tracing::trace!("No listeners for {}", message.kind);
        return;
    };

    for entry in entries.iter() {
        // One failing subscriber must not block delivery to the rest.
        if let Err(e) = (entry.callback)(message) {
            tracing::error!("Sync listener failed for {}: {e}", message.kind);
        }
    }
}

impl Drop for SessionSync {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl fmt::Debug for SessionSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSync")
            .field("client_id", &self.client_id)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Owned registration handle returned by [`SessionSync::subscribe`].
pub struct SyncSubscription {
    id: u64,
    kind: SyncEventKind,
    listeners: Arc<ListenerMap>,
}

impl SyncSubscription {
    /// Unregister the listener explicitly.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for SyncSubscription {
    fn drop(&mut self) {
        if let Some(mut entries) = self.listeners.get_mut(&self.kind) {
            entries.retain(|entry| entry.id != self.id);
        }
    }
}

impl fmt::Debug for SyncSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSubscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
