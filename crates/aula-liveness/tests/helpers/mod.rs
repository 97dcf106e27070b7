//! Shared in-memory fakes for integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use aula_api::gateway::{NotificationGateway, SecuritySettingsGateway};
use aula_api::realtime::{ChannelEvent, ChannelHandle, ChannelStatus, RealtimeGateway};
use aula_core::traits::auth::AuthState;
use aula_core::traits::navigator::Navigator;
use aula_core::traits::notifier::{Toast, UiNotifier};
use aula_core::types::id::{NotificationId, UserId};
use aula_core::{AppError, AppResult};
use aula_entity::notification::kind::{NotificationKind, NotificationSeverity};
use aula_entity::notification::model::{NewNotification, Notification};
use aula_entity::settings::model::SecuritySetting;

/// Auth state with a switchable user.
#[derive(Debug)]
pub struct FakeAuth {
    pub user: watch::Sender<Option<UserId>>,
    pub sign_outs: AtomicUsize,
}

impl FakeAuth {
    pub fn signed_in() -> (Arc<Self>, UserId) {
        let user = UserId::new();
        (
            Arc::new(Self {
                user: watch::channel(Some(user)).0,
                sign_outs: AtomicUsize::new(0),
            }),
            user,
        )
    }
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
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        self.user.send_replace(None);
        Ok(())
    }
}

/// Toast recorder.
#[derive(Debug, Default)]
pub struct FakeNotifier {
    pub toasts: Mutex<Vec<Toast>>,
}

impl UiNotifier for FakeNotifier {
    fn toast(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

/// Navigator with an observable path and navigation history.
#[derive(Debug)]
pub struct FakeNavigator {
    pub path: watch::Sender<String>,
    pub history: Mutex<Vec<String>>,
}

impl FakeNavigator {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            path: watch::channel(path.to_string()).0,
            history: Mutex::new(Vec::new()),
        })
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

/// Notification backend with a mutable in-memory table.
#[derive(Debug, Default)]
pub struct FakeNotificationBackend {
    pub rows: Mutex<Vec<Notification>>,
    pub list_calls: AtomicUsize,
}

impl FakeNotificationBackend {
    pub fn insert_row(&self, user: UserId, title: &str) -> Notification {
        let row = sample_notification(user, title, NotificationKind::NewMessage);
        self.rows.lock().unwrap().insert(0, row.clone());
        row
    }
}

#[async_trait]
impl NotificationGateway for FakeNotificationBackend {
    async fn list(&self, user: UserId) -> AppResult<Vec<Notification>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user)
            .cloned()
            .collect())
    }

    async fn unread_count(&self, user: UserId) -> AppResult<u64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user && !n.read)
            .count() as u64)
    }

    async fn mark_read(&self, id: NotificationId, _user: UserId) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|n| n.id == id) {
            Some(row) => {
                row.read = true;
                Ok(())
            }
            None => Err(AppError::not_found("no such notification")),
        }
    }

    async fn mark_all_read(&self, user: UserId) -> AppResult<()> {
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.user_id == user {
                row.read = true;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: NotificationId, _user: UserId) -> AppResult<()> {
        self.rows.lock().unwrap().retain(|n| n.id != id);
        Ok(())
    }

    async fn clear_all(&self, user: UserId) -> AppResult<()> {
        self.rows.lock().unwrap().retain(|n| n.user_id != user);
        Ok(())
    }

    async fn create(&self, new: NewNotification) -> AppResult<Notification> {
        let row = Notification {
            id: NotificationId::new(),
            user_id: new.user_id,
            title: new.title,
            message: new.message,
            severity: new.severity,
            kind: new.kind,
            read: false,
            action_url: new.action_url,
            action_data: new.action_data,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.rows.lock().unwrap().insert(0, row.clone());
        Ok(row)
    }
}

/// Realtime gateway whose subscriptions can be forced to fail, and
/// whose live channel is scriptable from the test.
#[derive(Debug, Default)]
pub struct ScriptedRealtime {
    pub subscribe_calls: AtomicUsize,
    pub failing: AtomicBool,
    pub live: Mutex<Option<mpsc::Sender<ChannelEvent>>>,
}

impl ScriptedRealtime {
    pub fn failing() -> Arc<Self> {
        let gateway = Self::default();
        gateway.failing.store(true, Ordering::SeqCst);
        Arc::new(gateway)
    }

    /// Push a row change through the live channel.
    pub fn push(&self, event: ChannelEvent) {
        if let Some(tx) = self.live.lock().unwrap().as_ref() {
            tx.try_send(event).expect("live channel full");
        }
    }
}

#[async_trait]
impl RealtimeGateway for ScriptedRealtime {
    async fn subscribe(&self, _user: UserId) -> AppResult<ChannelHandle> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(16);

        if self.failing.load(Ordering::SeqCst) {
            tx.try_send(ChannelEvent::Status(ChannelStatus::ChannelError))
                .expect("fresh channel");
        } else {
            tx.try_send(ChannelEvent::Status(ChannelStatus::Subscribed))
                .expect("fresh channel");
            *self.live.lock().unwrap() = Some(tx);
        }

        Ok(ChannelHandle::new(rx, CancellationToken::new()))
    }
}

/// Connectivity probe with scriptable native flag and reachability.
#[derive(Debug)]
pub struct FakeProbe {
    pub native: watch::Sender<bool>,
    pub reachable: AtomicBool,
}

impl FakeProbe {
    pub fn online() -> Arc<Self> {
        Arc::new(Self {
            native: watch::channel(true).0,
            reachable: AtomicBool::new(true),
        })
    }
}

#[async_trait]
impl aula_core::traits::probe::ConnectivityProbe for FakeProbe {
    fn native_flag(&self) -> bool {
        *self.native.borrow()
    }

    async fn probe(&self, _target: &str, _timeout: std::time::Duration) -> bool {
        self.reachable.load(Ordering::SeqCst)
    }

    fn connection_info(&self) -> Option<aula_core::types::network::ConnectionInfo> {
        None
    }

    fn flag_changes(&self) -> watch::Receiver<bool> {
        self.native.subscribe()
    }
}

/// Session-activity gateway that records heartbeats.
#[derive(Debug, Default)]
pub struct FakeActivityGateway {
    pub heartbeats: AtomicUsize,
}

#[async_trait]
impl aula_api::gateway::SessionActivityGateway for FakeActivityGateway {
    async fn update_activity(&self, _access_token: &str) -> AppResult<bool> {
        self.heartbeats.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

/// Fixed security settings.
#[derive(Debug)]
pub struct FakeSettings {
    pub timeout_minutes: u64,
}

#[async_trait]
impl SecuritySettingsGateway for FakeSettings {
    async fn security_settings(&self) -> AppResult<Vec<SecuritySetting>> {
        Ok(vec![SecuritySetting {
            setting_key: "session_timeout_minutes".to_string(),
            setting_value: self.timeout_minutes.to_string(),
        }])
    }
}

/// Build a sample notification row.
pub fn sample_notification(user: UserId, title: &str, kind: NotificationKind) -> Notification {
    Notification {
        id: NotificationId::new(),
        user_id: user,
        title: title.to_string(),
        message: "integration fixture".to_string(),
        severity: NotificationSeverity::Info,
        kind,
        read: false,
        action_url: None,
        action_data: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}
