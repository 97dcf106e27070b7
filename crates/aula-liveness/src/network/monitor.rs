//! Network status monitor.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{Notify, broadcast, watch};
use tokio_util::sync::CancellationToken;

use aula_core::config::network::NetworkConfig;
use aula_core::events::network::NetworkEvent;
use aula_core::traits::probe::ConnectivityProbe;
use aula_core::types::network::NetworkStatus;

use super::classify;

/// Monitors connectivity and classifies connection quality.
///
/// The current [`NetworkStatus`] is a reactive value: read it with
/// [`NetworkMonitor::status`] or observe it through
/// [`NetworkMonitor::watch_status`]. Transitions additionally emit
/// [`NetworkEvent`]s.
#[derive(Debug)]
pub struct NetworkMonitor {
    /// Injected connectivity capability.
    probe: Arc<dyn ConnectivityProbe>,
    /// Monitor configuration.
    config: NetworkConfig,
    /// Latest status snapshot.
    status: watch::Sender<NetworkStatus>,
    /// Transition events.
    events: broadcast::Sender<NetworkEvent>,
    /// Whether a refresh is currently in flight.
    checking: AtomicBool,
    /// Debounced manual refresh requests.
    refresh_requests: Notify,
}

impl NetworkMonitor {
    /// Create a new monitor. The initial status trusts the native flag
    /// until the first probe runs.
    pub fn new(probe: Arc<dyn ConnectivityProbe>, config: NetworkConfig) -> Self {
        let initial = NetworkStatus::initial(probe.native_flag());
        Self {
            probe,
            config,
            status: watch::channel(initial).0,
            events: broadcast::channel(32).0,
            checking: AtomicBool::new(false),
            refresh_requests: Notify::new(),
        }
    }

    /// The latest status snapshot.
    pub fn status(&self) -> NetworkStatus {
        self.status.borrow().clone()
    }

    /// Receiver tracking status snapshots.
    pub fn watch_status(&self) -> watch::Receiver<NetworkStatus> {
        self.status.subscribe()
    }

    /// Receiver of transition events.
    pub fn events(&self) -> broadcast::Receiver<NetworkEvent> {
        self.events.subscribe()
    }

    /// Whether a refresh is currently in flight.
    pub fn is_checking(&self) -> bool {
        self.checking.load(Ordering::SeqCst)
    }

    /// Request a debounced refresh from the background loop.
    pub fn request_refresh(&self) {
        self.refresh_requests.notify_one();
    }

    /// Recompute the status.
    ///
    /// With `skip_probe` set, the native flag is trusted as-is. When
    /// probing, any reachable target means online, and the probe result
    /// wins over a disagreeing native flag.
    pub async fn refresh(&self, skip_probe: bool) -> NetworkStatus {
        self.checking.store(true, Ordering::SeqCst);

        let native = self.probe.native_flag();
        let connection = self.probe.connection_info();

        let is_online = if native && !skip_probe {
            let reachable = self.probe_any().await;
            if !reachable {
                tracing::warn!("Native flag reports online but no probe target is reachable");
            }
            reachable
        } else {
            native
        };

        let quality = classify::classify_quality(connection.as_ref(), is_online);
        let new_status = NetworkStatus {
            is_online,
            connection_type: classify::connection_type_label(connection.as_ref()),
            quality,
            is_slow: classify::is_slow(connection.as_ref(), quality),
            last_checked: chrono::Utc::now(),
            connection,
        };

        let previous = self.status.borrow().clone();
        if previous.is_online != new_status.is_online {
            let event = if new_status.is_online {
                NetworkEvent::Online
            } else {
                NetworkEvent::Offline
            };
            let _ = self.events.send(event);
        } else if new_status.is_online && previous.quality != new_status.quality {
            let _ = self.events.send(NetworkEvent::QualityChanged {
                quality: new_status.quality,
            });
        }

        self.status.send_replace(new_status.clone());
        self.checking.store(false, Ordering::SeqCst);
        new_status
    }

    /// Race all configured probe targets; any success means online.
    ///
    /// Each probe carries its own timeout, and a finished winner does
    /// not wait for slower losers. Probe failures are non-signals.
    async fn probe_any(&self) -> bool {
        if self.config.probe_targets.is_empty() {
            return self.probe.native_flag();
        }

        let mut probes: FuturesUnordered<_> = self
            .config
            .probe_targets
            .iter()
            .map(|target| {
                self.probe
                    .probe(&target.url, Duration::from_millis(target.timeout_ms))
            })
            .collect();

        while let Some(reachable) = probes.next().await {
            if reachable {
                return true;
            }
        }
        false
    }

    /// Run the monitor loop until cancelled.
    ///
    /// Performs a probe-free initial refresh for fast startup, then
    /// re-checks on native flag changes, on debounced manual requests,
    /// and periodically while the native flag reports online.
    pub async fn run(&self, cancel: CancellationToken) {
        self.refresh(true).await;

        let mut flag_changes = self.probe.flag_changes();
        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.check_interval_seconds));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    if self.probe.native_flag() {
                        self.refresh(false).await;
                    }
                }
                changed = flag_changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let online = *flag_changes.borrow();
                    tracing::debug!(online, "Native connectivity flag changed");
                    // Probing is pointless while the flag says offline.
                    self.refresh(!online).await;
                }
                _ = self.refresh_requests.notified() => {
                    tokio::time::sleep(Duration::from_millis(self.config.refresh_debounce_ms))
                        .await;
                    // Collapse requests that arrived during the debounce.
                    let _ = self.refresh_requests.notified().now_or_never();
                    self.refresh(false).await;
                }
            }
        }

        tracing::debug!("Network monitor loop ended");
    }
}
