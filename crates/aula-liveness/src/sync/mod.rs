//! Cross-instance session sync.
//!
//! Relays session events ("extended", "timed out") between instances
//! of the same signed-in session (other tabs, windows, or processes)
//! so they all extend and sign out together. Delivery is at-least-once
//! and best-effort; reactions must be idempotent.

pub mod message;
pub mod service;
pub mod transport;

pub use message::{SyncEventKind, SyncMessage};
pub use service::{SessionSync, SyncSubscription};
pub use transport::{BroadcastTransport, SignalStore, StorageRelayTransport, SyncTransport};
