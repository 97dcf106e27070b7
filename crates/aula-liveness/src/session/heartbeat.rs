//! Periodic session-activity heartbeat.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use aula_api::gateway::SessionActivityGateway;
use aula_core::config::session::SessionConfig;
use aula_core::traits::auth::AuthState;
use aula_core::types::network::NetworkStatus;

/// Run the activity heartbeat loop until cancelled.
///
/// Best-effort: persists "last active now" for the current session on
/// a fixed interval, starting immediately. Skipped while offline or
/// signed out; failures are logged and swallowed, so the heartbeat never
/// blocks the features it supports.
pub async fn run_activity_heartbeat(
    auth: Arc<dyn AuthState>,
    gateway: Arc<dyn SessionActivityGateway>,
    network: watch::Receiver<NetworkStatus>,
    config: &SessionConfig,
    cancel: CancellationToken,
) {
    let mut interval =
        tokio::time::interval(Duration::from_secs(config.activity_heartbeat_seconds));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if !network.borrow().is_online {
                    continue;
                }
                let Some(token) = auth.access_token() else {
                    continue;
                };

                match gateway.update_activity(&token).await {
                    Ok(true) => tracing::trace!("Session activity heartbeat sent"),
                    Ok(false) => {
                        tracing::debug!("Backend no longer recognizes this session");
                    }
                    Err(e) => tracing::warn!("Session activity heartbeat failed: {e}"),
                }
            }
        }
    }

    tracing::debug!("Session activity heartbeat loop ended");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use aula_core::AppResult;
    use aula_core::types::id::UserId;

    use super::*;

    #[derive(Debug)]
    struct FakeAuth {
        user: watch::Sender<Option<UserId>>,
    }

    #[async_trait]
    impl AuthState for FakeAuth {
        fn current_user(&self) -> Option<UserId> {
            *self.user.borrow()
        }

        fn access_token(&self) -> Option<String> {
            self.current_user().map(|_| "token".to_string())
        }

        fn user_changes(&self) -> watch::Receiver<Option<UserId>> {
            self.user.subscribe()
        }

        async fn sign_out(&self) -> AppResult<()> {
            self.user.send_replace(None);
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct CountingGateway {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionActivityGateway for CountingGateway {
        async fn update_activity(&self, _access_token: &str) -> AppResult<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_fires_immediately_then_on_interval() {
        let auth = Arc::new(FakeAuth {
            user: watch::channel(Some(UserId::new())).0,
        });
        let gateway = Arc::new(CountingGateway::default());
        let network = watch::channel(NetworkStatus::initial(true)).0.subscribe();
        let config = SessionConfig::default();
        let cancel = CancellationToken::new();

        let task = tokio::spawn({
            let auth = auth.clone();
            let gateway = gateway.clone();
            let cancel = cancel.clone();
            async move {
                run_activity_heartbeat(auth, gateway, network, &config, cancel).await;
            }
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(300)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);

        cancel.cancel();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_heartbeat_skipped_while_offline() {
        let auth = Arc::new(FakeAuth {
            user: watch::channel(Some(UserId::new())).0,
        });
        let gateway = Arc::new(CountingGateway::default());
        let network = watch::channel(NetworkStatus::initial(false)).0.subscribe();
        let config = SessionConfig::default();
        let cancel = CancellationToken::new();

        let task = tokio::spawn({
            let auth = auth.clone();
            let gateway = gateway.clone();
            let cancel = cancel.clone();
            async move {
                run_activity_heartbeat(auth, gateway, network, &config, cancel).await;
            }
        });

        tokio::time::advance(Duration::from_secs(900)).await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);

        cancel.cancel();
        task.await.unwrap();
    }
}
