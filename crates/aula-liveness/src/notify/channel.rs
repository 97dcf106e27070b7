//! Realtime feed connection lifecycle.
//!
//! Drives the subscription for the signed-in user: connect, deliver
//! row changes to the center, reconnect with exponential backoff on
//! channel errors, and fall back to fixed-interval polling once the
//! bounded retry count is exhausted. Polling is a transparent
//! degradation: the reported status stays "connected", while the
//! transport mode is observable separately.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio_util::sync::CancellationToken;

use aula_api::realtime::{ChannelEvent, ChannelStatus, RealtimeGateway};
use aula_core::config::notifications::NotificationsConfig;
use aula_core::traits::auth::AuthState;
use aula_core::types::connection::ConnectionState;
use aula_core::types::id::UserId;

use super::center::NotificationCenter;

/// How updates are currently flowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Live realtime subscription.
    Realtime,
    /// Fixed-interval polling after exhausted realtime retries.
    Polling,
    /// No delivery path (signed out or shut down).
    Idle,
}

/// Why the inner event loop stopped.
enum Exit {
    Cancelled,
    UserChanged,
    Retry,
    ManualReconnect,
}

/// Owns the realtime subscription lifecycle for one client instance.
///
/// Exactly one `RealtimeFeed` may drive a given center; the
/// subscription handle, polling interval, and backoff timers all live
/// inside [`RealtimeFeed::run`] and die with its cancellation token.
#[derive(Debug)]
pub struct RealtimeFeed {
    /// Feed configuration.
    config: NotificationsConfig,
    /// The center receiving row changes.
    center: Arc<NotificationCenter>,
    /// Subscription gateway.
    realtime: Arc<dyn RealtimeGateway>,
    /// Auth capability driving setup/teardown.
    auth: Arc<dyn AuthState>,
    /// Internal connection lifecycle state.
    state: watch::Sender<ConnectionState>,
    /// Manual reconnect requests.
    reconnects: Notify,
}

impl RealtimeFeed {
    /// Create a new feed driver.
    pub fn new(
        config: NotificationsConfig,
        center: Arc<NotificationCenter>,
        realtime: Arc<dyn RealtimeGateway>,
        auth: Arc<dyn AuthState>,
    ) -> Self {
        Self {
            config,
            center,
            realtime,
            auth,
            state: watch::channel(ConnectionState::Disconnected).0,
            reconnects: Notify::new(),
        }
    }

    /// The connection status as reported to the UI.
    ///
    /// Polling reports as connected; see [`RealtimeFeed::transport_mode`]
    /// for the observability signal that tells them apart.
    pub fn connection_status(&self) -> ConnectionState {
        self.state.borrow().reported()
    }

    /// The actual delivery path currently in use.
    pub fn transport_mode(&self) -> TransportMode {
        match *self.state.borrow() {
            ConnectionState::Connected => TransportMode::Realtime,
            ConnectionState::Polling => TransportMode::Polling,
            _ => TransportMode::Idle,
        }
    }

    /// Receiver tracking the internal lifecycle state.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Reset backoff and polling, then retry the realtime path.
    pub fn reconnect(&self) {
        self.reconnects.notify_one();
    }

    /// Run the feed until cancelled.
    ///
    /// Reacts to sign-in/sign-out transitions: on sign-in, loads the
    /// feed and opens the subscription; on sign-out, tears everything
    /// down.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut user_changes = self.auth.user_changes();

        loop {
            let user = *user_changes.borrow_and_update();

            match user {
                None => {
                    self.set_state(ConnectionState::Disconnected);
                    self.center.reset();

                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        changed = user_changes.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                    }
                }
                Some(user) => {
                    if let Err(e) = self.center.load(user).await {
                        tracing::warn!("Initial notification load failed: {e}");
                    }

                    if let Exit::Cancelled = self.drive(user, &mut user_changes, &cancel).await {
                        break;
                    }
                }
            }
        }

        self.set_state(ConnectionState::Disconnected);
        tracing::debug!("Realtime feed loop ended");
    }

    /// Connection driver for one signed-in user.
    async fn drive(
        &self,
        user: UserId,
        user_changes: &mut watch::Receiver<Option<UserId>>,
        cancel: &CancellationToken,
    ) -> Exit {
        let mut attempts: u32 = 0;

        loop {
            self.set_state(ConnectionState::Connecting);

            match self.realtime.subscribe(user).await {
                Ok(mut handle) => {
                    match self
                        .pump_events(&mut handle, user_changes, cancel, &mut attempts)
                        .await
                    {
                        Exit::Retry => {}
                        Exit::ManualReconnect => {
                            attempts = 0;
                            continue;
                        }
                        exit => return exit,
                    }
                }
                Err(e) => {
                    tracing::debug!("Realtime subscription failed: {e}");
                }
            }

            self.set_state(ConnectionState::Error);
            attempts += 1;

            if attempts >= self.config.max_reconnect_attempts {
                match self.poll(user, user_changes, cancel).await {
                    Exit::ManualReconnect => {
                        attempts = 0;
                        continue;
                    }
                    exit => return exit,
                }
            }

            let delay = Duration::from_millis(
                self.config.reconnect_base_delay_ms << (attempts.saturating_sub(1)),
            );
            tracing::debug!(
                "Retrying realtime subscription in {delay:?} (attempt {attempts}/{})",
                self.config.max_reconnect_attempts
            );

            tokio::select! {
                _ = cancel.cancelled() => return Exit::Cancelled,
                changed = user_changes.changed() => {
                    if changed.is_err() {
                        return Exit::Cancelled;
                    }
                    return Exit::UserChanged;
                }
                _ = tokio::time::sleep(delay) => {}
                _ = self.reconnects.notified() => {
                    attempts = 0;
                }
            }
        }
    }

    /// Deliver events from a live subscription until it breaks.
    async fn pump_events(
        &self,
        handle: &mut aula_api::realtime::ChannelHandle,
        user_changes: &mut watch::Receiver<Option<UserId>>,
        cancel: &CancellationToken,
        attempts: &mut u32,
    ) -> Exit {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Exit::Cancelled,
                changed = user_changes.changed() => {
                    if changed.is_err() {
                        return Exit::Cancelled;
                    }
                    return Exit::UserChanged;
                }
                _ = self.reconnects.notified() => return Exit::ManualReconnect,
                event = handle.next_event() => match event {
                    Some(ChannelEvent::Status(ChannelStatus::Subscribed)) => {
                        self.set_state(ConnectionState::Connected);
                        *attempts = 0;
                    }
                    Some(ChannelEvent::Status(status)) => {
                        tracing::debug!("Realtime channel reported {status:?}");
                        return Exit::Retry;
                    }
                    Some(ChannelEvent::Change(change)) => {
                        self.center.handle_change(change);
                    }
                    None => {
                        tracing::debug!("Realtime channel closed");
                        return Exit::Retry;
                    }
                },
            }
        }
    }

    /// Degraded delivery: poll the load path on a fixed interval.
    async fn poll(
        &self,
        user: UserId,
        user_changes: &mut watch::Receiver<Option<UserId>>,
        cancel: &CancellationToken,
    ) -> Exit {
        self.set_state(ConnectionState::Polling);
        tracing::info!(
            "Realtime retries exhausted, polling every {}s",
            self.config.polling_interval_seconds
        );

        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.polling_interval_seconds));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Exit::Cancelled,
                changed = user_changes.changed() => {
                    if changed.is_err() {
                        return Exit::Cancelled;
                    }
                    return Exit::UserChanged;
                }
                _ = self.reconnects.notified() => return Exit::ManualReconnect,
                _ = interval.tick() => {
                    if let Err(e) = self.center.load(user).await {
                        tracing::debug!("Notification poll failed: {e}");
                    }
                }
            }
        }
    }

    fn set_state(&self, next: ConnectionState) {
        let current = *self.state.borrow();
        if current == next {
            return;
        }
        if !current.can_transition(next) {
            tracing::warn!("Unexpected connection transition {current} -> {next}");
        }
        self.state.send_replace(next);
    }
}
