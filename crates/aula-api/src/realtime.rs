//! Realtime channel gateway — trait, event types, and the WebSocket
//! implementation.
//!
//! The channel delivers row-level changes of the per-user notification
//! table, filtered server-side by user id. Consumers own the returned
//! [`ChannelHandle`]; dropping it closes the underlying connection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use aula_core::error::AppError;
use aula_core::result::AppResult;
use aula_core::traits::auth::AuthState;
use aula_core::types::id::{NotificationId, UserId};
use aula_entity::notification::model::Notification;

/// Status of the realtime subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    /// The subscription is live.
    Subscribed,
    /// The channel reported an error.
    ChannelError,
    /// The subscription attempt timed out.
    TimedOut,
    /// The server closed the channel.
    Closed,
}

/// A row-level change on the notification table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowChange {
    /// A notification row was inserted.
    Insert {
        /// The new row.
        notification: Notification,
    },
    /// A notification row was updated.
    Update {
        /// The row after the update.
        notification: Notification,
    },
    /// A notification row was deleted.
    Delete {
        /// Identifier of the deleted row.
        id: NotificationId,
    },
}

/// Event delivered through a [`ChannelHandle`].
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// Subscription status change.
    Status(ChannelStatus),
    /// Row-level change.
    Change(RowChange),
}

/// Owned handle to a live subscription.
///
/// The underlying connection is closed when the handle is dropped or
/// [`ChannelHandle::close`] is called; no reader task survives it.
#[derive(Debug)]
pub struct ChannelHandle {
    events: mpsc::Receiver<ChannelEvent>,
    cancel: CancellationToken,
}

impl ChannelHandle {
    /// Build a handle from its parts. Used by gateway implementations
    /// and test fakes.
    pub fn new(events: mpsc::Receiver<ChannelEvent>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Receive the next event. Returns `None` once the channel is closed.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        self.events.recv().await
    }

    /// Close the subscription explicitly.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Gateway for opening realtime subscriptions.
#[async_trait]
pub trait RealtimeGateway: Send + Sync + std::fmt::Debug + 'static {
    /// Open a subscription to the given user's notification stream.
    async fn subscribe(&self, user_id: UserId) -> AppResult<ChannelHandle>;
}

/// Frames sent by the client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame {
    Subscribe { channel: String },
    Pong { timestamp: i64 },
}

/// Frames sent by the server.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerFrame {
    Subscribed {
        #[allow(dead_code)]
        channel: String,
    },
    Insert {
        notification: Notification,
    },
    Update {
        notification: Notification,
    },
    Delete {
        id: NotificationId,
    },
    Ping {
        timestamp: i64,
    },
    Error {
        code: String,
        message: String,
    },
}

/// Realtime gateway over a WebSocket connection.
#[derive(Debug, Clone)]
pub struct WsRealtimeGateway {
    /// Realtime endpoint URL, without trailing slash.
    realtime_url: String,
    /// Auth state supplying the access token.
    auth: Arc<dyn AuthState>,
    /// Timeout for the connection handshake.
    connect_timeout: Duration,
}

impl WsRealtimeGateway {
    /// Create a new WebSocket realtime gateway.
    pub fn new(realtime_url: &str, auth: Arc<dyn AuthState>) -> Self {
        Self {
            realtime_url: realtime_url.trim_end_matches('/').to_string(),
            auth,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[async_trait]
impl RealtimeGateway for WsRealtimeGateway {
    async fn subscribe(&self, user_id: UserId) -> AppResult<ChannelHandle> {
        let token = self
            .auth
            .access_token()
            .ok_or_else(|| AppError::session("No access token for realtime subscription"))?;

        let url = format!("{}/{token}", self.realtime_url);

        let (stream, _) = tokio::time::timeout(self.connect_timeout, connect_async(&url))
            .await
            .map_err(|_| AppError::network("Realtime connection timed out"))?
            .map_err(|e| AppError::with_source(
                aula_core::error::ErrorKind::Subscription,
                format!("Realtime connection failed: {e}"),
                e,
            ))?;

        let (mut writer, mut reader) = stream.split();

        let subscribe = ClientFrame::Subscribe {
            channel: format!("notifications:{user_id}"),
        };
        let frame = serde_json::to_string(&subscribe)?;
        writer
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| AppError::subscription(format!("Failed to send subscribe frame: {e}")))?;

        let (tx, rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();
        let reader_cancel = cancel.clone();

        tokio::spawn(async move {
            loop {
                let message = tokio::select! {
                    _ = reader_cancel.cancelled() => break,
                    message = reader.next() => message,
                };

                match message {
                    Some(Ok(Message::Text(text))) => {
                        let frame: ServerFrame = match serde_json::from_str(text.as_str()) {
                            Ok(frame) => frame,
                            Err(e) => {
                                tracing::warn!("Discarding malformed realtime frame: {e}");
                                continue;
                            }
                        };

                        let event = match frame {
                            ServerFrame::Subscribed { .. } => {
                                ChannelEvent::Status(ChannelStatus::Subscribed)
                            }
                            ServerFrame::Insert { notification } => {
                                ChannelEvent::Change(RowChange::Insert { notification })
                            }
                            ServerFrame::Update { notification } => {
                                ChannelEvent::Change(RowChange::Update { notification })
                            }
                            ServerFrame::Delete { id } => {
                                ChannelEvent::Change(RowChange::Delete { id })
                            }
                            ServerFrame::Ping { timestamp } => {
                                let pong = ClientFrame::Pong { timestamp };
                                if let Ok(frame) = serde_json::to_string(&pong) {
                                    let _ = writer.send(Message::Text(frame.into())).await;
                                }
                                continue;
                            }
                            ServerFrame::Error { code, message } => {
                                tracing::debug!("Realtime channel error {code}: {message}");
                                ChannelEvent::Status(ChannelStatus::ChannelError)
                            }
                        };

                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        let _ = tx.send(ChannelEvent::Status(ChannelStatus::Closed)).await;
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("Realtime read error: {e}");
                        let _ = tx
                            .send(ChannelEvent::Status(ChannelStatus::ChannelError))
                            .await;
                        break;
                    }
                }
            }
        });

        Ok(ChannelHandle::new(rx, cancel))
    }
}
