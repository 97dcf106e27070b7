//! Session timeout guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

use aula_core::config::session::SessionConfig;
use aula_core::error::AppError;
use aula_core::events::session::{EventOrigin, SessionEvent};
use aula_core::traits::auth::AuthState;
use aula_core::traits::navigator::Navigator;
use aula_core::traits::notifier::{Toast, UiNotifier};
use aula_core::types::network::NetworkStatus;

use crate::sync::message::SyncEventKind;
use crate::sync::service::SessionSync;

use super::activity::{ActivityEvent, ActivityTracker};
use super::policy::TimeoutPolicy;

/// Signs the user out after the policy-configured idle period,
/// synchronized across instances.
///
/// State machine: idle tracking → warning (5 minutes before expiry) →
/// timeout sequence → signed out. Any tracked activity while idle
/// resets the clock; `extend_session` does the same and tells other
/// instances to reset too.
#[derive(Debug)]
pub struct SessionTimeoutGuard {
    /// Guard configuration.
    config: SessionConfig,
    /// Auth capability for the current user and sign-out.
    auth: Arc<dyn AuthState>,
    /// Cross-instance sync service.
    sync: Arc<SessionSync>,
    /// Latest network status, to skip checks while offline.
    network: watch::Receiver<NetworkStatus>,
    /// Toast surface.
    notifier: Arc<dyn UiNotifier>,
    /// Navigation capability.
    navigator: Arc<dyn Navigator>,
    /// Idle clock.
    activity: ActivityTracker,
    /// Effective timeout source.
    policy: TimeoutPolicy,
    /// Emitted guard events.
    events: broadcast::Sender<SessionEvent>,
    /// Re-entrancy guard: only one timeout sequence may run at a time.
    handling_timeout: Arc<AtomicBool>,
    /// Whether an expiry warning is currently raised.
    warning_active: AtomicBool,
}

impl SessionTimeoutGuard {
    /// Create a new guard.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: SessionConfig,
        auth: Arc<dyn AuthState>,
        sync: Arc<SessionSync>,
        network: watch::Receiver<NetworkStatus>,
        notifier: Arc<dyn UiNotifier>,
        navigator: Arc<dyn Navigator>,
        policy: TimeoutPolicy,
    ) -> Self {
        Self {
            config,
            auth,
            sync,
            network,
            notifier,
            navigator,
            activity: ActivityTracker::new(),
            policy,
            events: broadcast::channel(32).0,
            handling_timeout: Arc::new(AtomicBool::new(false)),
            warning_active: AtomicBool::new(false),
        }
    }

    /// Receiver of guard events.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// The effective timeout in minutes.
    pub fn timeout_minutes(&self) -> u64 {
        self.policy.current_minutes()
    }

    /// Record a tracked activity event.
    ///
    /// Activity from the warning surface is ignored: clicking "stay
    /// signed in" goes through [`SessionTimeoutGuard::extend_session`],
    /// everything else on that surface must not silently extend.
    pub fn record_activity(&self, event: ActivityEvent) {
        if event.from_warning_surface {
            return;
        }
        self.activity.record();
        self.clear_warning();
    }

    /// Reset the idle clock and tell other instances to reset too.
    pub fn extend_session(&self) {
        self.activity.record();
        self.clear_warning();
        let _ = self.events.send(SessionEvent::Extended {
            origin: EventOrigin::Local,
        });
        self.sync.broadcast(SyncEventKind::SessionExtended);
    }

    /// Compare idle time against the effective timeout.
    ///
    /// Skipped entirely while signed out or offline: there is no
    /// session to expire, and no point hitting the backend.
    pub async fn check_now(&self) {
        if self.auth.current_user().is_none() {
            return;
        }
        if !self.network.borrow().is_online {
            return;
        }

        let timeout = self.policy.timeout();
        let idle = self.activity.idle_duration();

        if idle >= timeout {
            self.trigger_timeout(EventOrigin::Local).await;
            return;
        }

        let lead = Duration::from_secs(self.config.warning_lead_seconds);
        if timeout > lead && idle >= timeout - lead {
            // Raise the warning at most once per idle episode.
            if !self.warning_active.swap(true, Ordering::SeqCst) {
                let remaining = (timeout - idle).as_secs();
                let _ = self.events.send(SessionEvent::TimeoutWarning {
                    remaining_seconds: remaining,
                });
            }
        }
    }

    /// Run the timeout sequence: expiry toast, sign-out, navigation to
    /// the login route, and (for locally detected timeouts) a broadcast
    /// so other instances sign out too.
    ///
    /// Guarded against re-entry; the guard resets after a short grace
    /// delay so a late duplicate trigger cannot start a second
    /// sequence.
    pub async fn trigger_timeout(&self, origin: EventOrigin) {
        if self.handling_timeout.swap(true, Ordering::SeqCst) {
            tracing::debug!("Timeout sequence already in progress");
            return;
        }

        tracing::info!(
            "Session timed out after {} minutes of inactivity ({origin:?})",
            self.policy.current_minutes()
        );
        self.warning_active.store(false, Ordering::SeqCst);

        self.notifier.toast(Toast::error(
            "Your session has expired due to inactivity. Please log in again.",
        ));

        if origin == EventOrigin::Local {
            self.sync.broadcast(SyncEventKind::SessionTimeout);
        }

        // A failed sign-out must not trap the user in a stale session;
        // navigation to login proceeds regardless.
        if let Err(e) = self.auth.sign_out().await {
            tracing::error!("Sign-out failed during session timeout: {e}");
        }

        self.navigator.navigate(&self.config.login_route, true);
        let _ = self.events.send(SessionEvent::TimedOut { origin });

        let handling = Arc::clone(&self.handling_timeout);
        let grace = Duration::from_secs(self.config.timeout_grace_seconds);
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            handling.store(false, Ordering::SeqCst);
        });
    }

    /// Run the guard loop until cancelled.
    ///
    /// Fetches the timeout policy, relays remote sync events, and
    /// checks idle time on a fixed interval.
    pub async fn run(&self, cancel: CancellationToken) {
        if self.network.borrow().is_online {
            self.policy.refresh().await;
        }

        let (remote_tx, mut remote_rx) = mpsc::channel::<SyncEventKind>(8);

        let extended_tx = remote_tx.clone();
        let _extended_sub = self
            .sync
            .subscribe(SyncEventKind::SessionExtended, move |message| {
                extended_tx.try_send(message.kind).map_err(|e| {
                    AppError::internal(format!("Failed to relay remote session event: {e}"))
                })
            });

        let _timeout_sub = self
            .sync
            .subscribe(SyncEventKind::SessionTimeout, move |message| {
                remote_tx.try_send(message.kind).map_err(|e| {
                    AppError::internal(format!("Failed to relay remote session event: {e}"))
                })
            });

        let mut user_changes = self.auth.user_changes();
        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.check_interval_seconds));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => self.check_now().await,
                event = remote_rx.recv() => match event {
                    Some(SyncEventKind::SessionExtended) => {
                        self.activity.record();
                        self.clear_warning();
                        let _ = self.events.send(SessionEvent::Extended {
                            origin: EventOrigin::Remote,
                        });
                    }
                    Some(SyncEventKind::SessionTimeout) => {
                        self.trigger_timeout(EventOrigin::Remote).await;
                    }
                    None => break,
                },
                changed = user_changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if user_changes.borrow().is_none() {
                        self.warning_active.store(false, Ordering::SeqCst);
                    } else {
                        self.activity.record();
                        if self.network.borrow().is_online {
                            self.policy.refresh().await;
                        }
                    }
                }
            }
        }

        tracing::debug!("Session timeout guard loop ended");
    }

    fn clear_warning(&self) {
        if self.warning_active.swap(false, Ordering::SeqCst) {
            let _ = self.events.send(SessionEvent::WarningCleared);
        }
    }
}
