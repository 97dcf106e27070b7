//! Top-level liveness runtime that ties the subsystems together.

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use aula_api::gateway::{NotificationGateway, SecuritySettingsGateway, SessionActivityGateway};
use aula_api::realtime::RealtimeGateway;
use aula_core::config::AppConfig;
use aula_core::traits::auth::AuthState;
use aula_core::traits::navigator::Navigator;
use aula_core::traits::notifier::UiNotifier;
use aula_core::traits::probe::ConnectivityProbe;

use crate::network::monitor::NetworkMonitor;
use crate::notify::center::NotificationCenter;
use crate::notify::channel::RealtimeFeed;
use crate::route::guard::OfflineRouteGuard;
use crate::session::guard::SessionTimeoutGuard;
use crate::session::heartbeat;
use crate::session::policy::TimeoutPolicy;
use crate::sync::service::SessionSync;
use crate::sync::transport::SyncTransport;

/// Host-provided capabilities and gateways the runtime is wired with.
#[derive(Clone)]
pub struct RuntimeServices {
    /// Cross-instance sync transport.
    pub transport: Arc<dyn SyncTransport>,
    /// Connectivity capability.
    pub probe: Arc<dyn ConnectivityProbe>,
    /// Auth state.
    pub auth: Arc<dyn AuthState>,
    /// Toast surface.
    pub notifier: Arc<dyn UiNotifier>,
    /// Navigation capability.
    pub navigator: Arc<dyn Navigator>,
    /// Notification backend gateway.
    pub notifications: Arc<dyn NotificationGateway>,
    /// Security settings gateway.
    pub settings: Arc<dyn SecuritySettingsGateway>,
    /// Session-activity heartbeat gateway.
    pub activity: Arc<dyn SessionActivityGateway>,
    /// Realtime channel gateway.
    pub realtime: Arc<dyn RealtimeGateway>,
}

impl fmt::Debug for RuntimeServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeServices").finish()
    }
}

/// Central runtime that owns every liveness subsystem and its
/// background loops.
///
/// All loops share one cancellation token: [`LivenessRuntime::shutdown`]
/// stops them and waits until each has finished, so no timer,
/// subscription, or task survives the runtime.
pub struct LivenessRuntime {
    /// Cross-instance sync service.
    pub sync: Arc<SessionSync>,
    /// Network status monitor.
    pub network: Arc<NetworkMonitor>,
    /// Session timeout guard.
    pub session_guard: Arc<SessionTimeoutGuard>,
    /// Notification center.
    pub notifications: Arc<NotificationCenter>,
    /// Realtime feed driver.
    pub feed: Arc<RealtimeFeed>,
    /// Offline route guard.
    pub route_guard: Arc<OfflineRouteGuard>,
    /// Runtime configuration.
    config: AppConfig,
    /// Host services for the loops that take them directly.
    services: RuntimeServices,
    /// Shared cancellation token for all loops.
    cancel: CancellationToken,
    /// Handles of spawned loops, awaited on shutdown.
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl LivenessRuntime {
    /// Wire up all subsystems. No background work starts until
    /// [`LivenessRuntime::start`].
    pub fn new(config: AppConfig, services: RuntimeServices) -> Self {
        let sync = Arc::new(SessionSync::new(Arc::clone(&services.transport)));
        let network = Arc::new(NetworkMonitor::new(
            Arc::clone(&services.probe),
            config.network.clone(),
        ));

        let policy = TimeoutPolicy::new(
            Arc::clone(&services.settings),
            config.session.default_timeout_minutes,
        );
        let session_guard = Arc::new(SessionTimeoutGuard::new(
            config.session.clone(),
            Arc::clone(&services.auth),
            Arc::clone(&sync),
            network.watch_status(),
            Arc::clone(&services.notifier),
            Arc::clone(&services.navigator),
            policy,
        ));

        let notifications = Arc::new(NotificationCenter::new(
            config.notifications.clone(),
            Arc::clone(&services.notifications),
            Arc::clone(&services.notifier),
        ));
        let feed = Arc::new(RealtimeFeed::new(
            config.notifications.clone(),
            Arc::clone(&notifications),
            Arc::clone(&services.realtime),
            Arc::clone(&services.auth),
        ));

        let route_guard = Arc::new(OfflineRouteGuard::new(
            config.route_guard.clone(),
            network.watch_status(),
            Arc::clone(&services.navigator),
            Arc::clone(&services.notifier),
        ));

        tracing::info!("Liveness runtime initialized");

        Self {
            sync,
            network,
            session_guard,
            notifications,
            feed,
            route_guard,
            config,
            services,
            cancel: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawn every background loop.
    pub fn start(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());

        let network = Arc::clone(&self.network);
        let cancel = self.cancel.clone();
        tasks.push(tokio::spawn(async move { network.run(cancel).await }));

        let session_guard = Arc::clone(&self.session_guard);
        let cancel = self.cancel.clone();
        tasks.push(tokio::spawn(async move { session_guard.run(cancel).await }));

        let feed = Arc::clone(&self.feed);
        let cancel = self.cancel.clone();
        tasks.push(tokio::spawn(async move { feed.run(cancel).await }));

        let route_guard = Arc::clone(&self.route_guard);
        let cancel = self.cancel.clone();
        tasks.push(tokio::spawn(async move { route_guard.run(cancel).await }));

        let auth = Arc::clone(&self.services.auth);
        let activity = Arc::clone(&self.services.activity);
        let network_status = self.network.watch_status();
        let session_config = self.config.session.clone();
        let cancel = self.cancel.clone();
        tasks.push(tokio::spawn(async move {
            heartbeat::run_activity_heartbeat(auth, activity, network_status, &session_config, cancel)
                .await;
        }));

        tracing::info!("Liveness runtime started");
    }

    /// Stop all loops and wait for them to finish.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down liveness runtime");
        self.cancel.cancel();

        let handles: Vec<JoinHandle<()>> = {
            let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
            tasks.drain(..).collect()
        };
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("Liveness task ended abnormally: {e}");
            }
        }

        tracing::info!("Liveness runtime shut down");
    }
}

impl fmt::Debug for LivenessRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivenessRuntime").finish()
    }
}
