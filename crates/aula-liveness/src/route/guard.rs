//! Offline route guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use aula_core::config::routes::RouteGuardConfig;
use aula_core::traits::navigator::Navigator;
use aula_core::traits::notifier::{Toast, UiNotifier};
use aula_core::types::network::NetworkStatus;
use aula_entity::user::role::UserRole;

use super::pattern;

/// Why a redirect is happening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RedirectReason {
    /// Connectivity was just lost on a disallowed route.
    WentOffline,
    /// A navigation to a disallowed route happened while offline.
    Navigation,
}

/// Redirects away from routes that cannot work offline.
///
/// Protection applies only to the configured roles; everyone else
/// navigates freely regardless of connectivity.
#[derive(Debug)]
pub struct OfflineRouteGuard {
    /// Guard configuration.
    config: RouteGuardConfig,
    /// The signed-in user's role, when known.
    role: watch::Sender<Option<UserRole>>,
    /// Latest network status.
    network: watch::Receiver<NetworkStatus>,
    /// Navigation capability.
    navigator: Arc<dyn Navigator>,
    /// Toast surface.
    notifier: Arc<dyn UiNotifier>,
    /// Whether the "offline" status toast was shown for this transition.
    shown_offline_toast: AtomicBool,
    /// Whether the "restored" status toast was shown for this transition.
    shown_online_toast: AtomicBool,
}

impl OfflineRouteGuard {
    /// Create a new guard.
    pub fn new(
        config: RouteGuardConfig,
        network: watch::Receiver<NetworkStatus>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn UiNotifier>,
    ) -> Self {
        Self {
            config,
            role: watch::channel(None).0,
            network,
            navigator,
            notifier,
            shown_offline_toast: AtomicBool::new(false),
            shown_online_toast: AtomicBool::new(false),
        }
    }

    /// Update the signed-in user's role.
    pub fn set_role(&self, role: Option<UserRole>) {
        self.role.send_replace(role);
    }

    /// Whether route protection applies to the current user.
    pub fn protection_applies(&self) -> bool {
        match *self.role.borrow() {
            Some(role) => self
                .config
                .enabled_roles
                .iter()
                .any(|enabled| enabled == role.as_str()),
            None => false,
        }
    }

    /// Whether `path` is accessible right now, without side effects.
    ///
    /// Always true when protection does not apply or the client is
    /// online; callers use this to disable links in advance.
    pub fn check_route_access(&self, path: &str) -> bool {
        if !self.protection_applies() {
            return true;
        }
        if self.network.borrow().is_online {
            return true;
        }
        pattern::is_allowed_offline(path, &self.config.allowed_offline_routes)
    }

    /// Run the guard loop until cancelled.
    ///
    /// Re-evaluates on every route change and online/offline
    /// transition.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut routes = self.navigator.route_changes();
        let mut network = self.network.clone();
        let mut was_online = network.borrow_and_update().is_online;

        // A session can start offline on a disallowed route.
        if !was_online {
            self.enforce(RedirectReason::WentOffline, &cancel).await;
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = routes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if !network.borrow().is_online {
                        self.enforce(RedirectReason::Navigation, &cancel).await;
                    }
                }
                changed = network.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let status = network.borrow_and_update().clone();
                    if status.is_online != was_online {
                        was_online = status.is_online;
                        self.show_status_toast(&status);
                        if !status.is_online {
                            self.enforce(RedirectReason::WentOffline, &cancel).await;
                        }
                    }
                }
            }
        }

        tracing::debug!("Offline route guard loop ended");
    }

    /// Redirect away from the current route if it is not usable
    /// offline.
    async fn enforce(&self, reason: RedirectReason, cancel: &CancellationToken) {
        if !self.protection_applies() {
            return;
        }

        let current = self.navigator.current_path();
        if pattern::is_allowed_offline(&current, &self.config.allowed_offline_routes) {
            tracing::debug!("Route '{current}' is allowed offline");
            return;
        }

        let status = self.network.borrow().clone();
        tracing::info!(
            "Route '{current}' not allowed offline, redirecting to '{}'",
            self.config.redirect_route
        );

        let title = match reason {
            RedirectReason::WentOffline => "You're now offline. Redirecting to available content...",
            RedirectReason::Navigation => "This page is not available offline. Redirecting...",
        };
        self.notifier.toast(
            Toast::info(title).with_description(format!(
                "Connection: {} ({})",
                status.connection_type, status.quality
            )),
        );

        // Let the toast render before yanking the route away.
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(Duration::from_millis(self.config.redirect_delay_ms)) => {}
        }

        self.navigator.navigate(&self.config.redirect_route, true);
    }

    /// Show the online/offline status toast, once per transition.
    fn show_status_toast(&self, status: &NetworkStatus) {
        if status.is_online {
            if !self.shown_online_toast.swap(true, Ordering::SeqCst) {
                self.shown_offline_toast.store(false, Ordering::SeqCst);
                self.notifier.toast(
                    Toast::success("Connection restored! Full access available.")
                        .with_description(format!("Connected via {}", status.connection_type))
                        .with_duration(3000),
                );
            }
        } else if !self.shown_offline_toast.swap(true, Ordering::SeqCst) {
            self.shown_online_toast.store(false, Ordering::SeqCst);
            self.notifier.toast(
                Toast::warning("You're now offline")
                    .with_description("Limited functionality available"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use aula_core::traits::notifier::ToastLevel;

    use super::*;

    #[derive(Debug, Default)]
    struct FakeNotifier {
        toasts: Mutex<Vec<Toast>>,
    }

    impl FakeNotifier {
        fn count_level(&self, level: ToastLevel) -> usize {
            self.toasts
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.level == level)
                .count()
        }
    }

    impl UiNotifier for FakeNotifier {
        fn toast(&self, toast: Toast) {
            self.toasts.lock().unwrap().push(toast);
        }
    }

    #[derive(Debug)]
    struct FakeNavigator {
        path: watch::Sender<String>,
        history: Mutex<Vec<String>>,
    }

    impl FakeNavigator {
        fn at(path: &str) -> Self {
            Self {
                path: watch::channel(path.to_string()).0,
                history: Mutex::new(Vec::new()),
            }
        }

        fn go(&self, path: &str) {
            self.path.send_replace(path.to_string());
        }
    }

    impl Navigator for FakeNavigator {
        fn current_path(&self) -> String {
            self.path.borrow().clone()
        }

        fn navigate(&self, path: &str, _replace: bool) {
            self.history.lock().unwrap().push(path.to_string());
            self.path.send_replace(path.to_string());
        }

        fn route_changes(&self) -> watch::Receiver<String> {
            self.path.subscribe()
        }
    }

    struct Harness {
        guard: Arc<OfflineRouteGuard>,
        network: watch::Sender<NetworkStatus>,
        navigator: Arc<FakeNavigator>,
        notifier: Arc<FakeNotifier>,
    }

    fn harness(online: bool, path: &str) -> Harness {
        let network = watch::channel(NetworkStatus::initial(online)).0;
        let navigator = Arc::new(FakeNavigator::at(path));
        let notifier = Arc::new(FakeNotifier::default());
        let guard = Arc::new(OfflineRouteGuard::new(
            RouteGuardConfig::default(),
            network.subscribe(),
            navigator.clone(),
            notifier.clone(),
        ));
        guard.set_role(Some(UserRole::Student));
        Harness {
            guard,
            network,
            navigator,
            notifier,
        }
    }

    fn offline_status() -> NetworkStatus {
        NetworkStatus::initial(false)
    }

    fn online_status() -> NetworkStatus {
        NetworkStatus::initial(true)
    }

    #[test]
    fn test_access_always_granted_when_protection_does_not_apply() {
        let h = harness(false, "/dashboard/quizzes");

        h.guard.set_role(None);
        assert!(h.guard.check_route_access("/dashboard/quizzes"));

        h.guard.set_role(Some(UserRole::Teacher));
        assert!(h.guard.check_route_access("/dashboard/quizzes"));
    }

    #[test]
    fn test_access_while_offline_follows_allow_list() {
        let h = harness(false, "/dashboard/quizzes");

        assert!(h.guard.check_route_access("/dashboard/offline-learning"));
        assert!(h.guard.check_route_access("/dashboard/courses/7/content"));
        assert!(!h.guard.check_route_access("/dashboard/quizzes"));
    }

    #[test]
    fn test_access_while_online_is_unrestricted() {
        let h = harness(true, "/dashboard/quizzes");
        assert!(h.guard.check_route_access("/dashboard/quizzes"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_navigation_redirects_after_toast_delay() {
        let h = harness(false, "/dashboard/offline-learning");
        let cancel = CancellationToken::new();
        let task = tokio::spawn({
            let guard = h.guard.clone();
            let cancel = cancel.clone();
            async move { guard.run(cancel).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        h.navigator.go("/dashboard/quizzes");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(
            h.navigator.history.lock().unwrap().as_slice(),
            ["/dashboard/offline-learning".to_string()]
        );
        assert_eq!(h.notifier.count_level(ToastLevel::Info), 1);

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_going_offline_shows_one_toast_despite_flapping() {
        let h = harness(true, "/dashboard/offline-learning");
        let cancel = CancellationToken::new();
        let task = tokio::spawn({
            let guard = h.guard.clone();
            let cancel = cancel.clone();
            async move { guard.run(cancel).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        h.network.send_replace(offline_status());
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.network.send_replace(offline_status());
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(h.notifier.count_level(ToastLevel::Warning), 1);

        h.network.send_replace(online_status());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(h.notifier.count_level(ToastLevel::Success), 1);

        h.network.send_replace(offline_status());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(h.notifier.count_level(ToastLevel::Warning), 2, "new transition");

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_transition_to_offline_redirects_disallowed_route() {
        let h = harness(true, "/dashboard/quizzes");
        let cancel = CancellationToken::new();
        let task = tokio::spawn({
            let guard = h.guard.clone();
            let cancel = cancel.clone();
            async move { guard.run(cancel).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        h.network.send_replace(offline_status());
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(
            h.navigator.history.lock().unwrap().as_slice(),
            ["/dashboard/offline-learning".to_string()]
        );

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_unprotected_role_is_never_redirected() {
        let h = harness(false, "/dashboard/quizzes");
        h.guard.set_role(Some(UserRole::Teacher));

        let cancel = CancellationToken::new();
        let task = tokio::spawn({
            let guard = h.guard.clone();
            let cancel = cancel.clone();
            async move { guard.run(cancel).await }
        });
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert!(h.navigator.history.lock().unwrap().is_empty());

        cancel.cancel();
        task.await.unwrap();
    }
}
