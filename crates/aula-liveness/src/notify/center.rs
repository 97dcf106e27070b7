//! Notification center — optimistic operations over the feed state.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;

use aula_api::gateway::NotificationGateway;
use aula_api::realtime::RowChange;
use aula_core::config::notifications::NotificationsConfig;
use aula_core::traits::notifier::{Toast, ToastLevel, UiNotifier};
use aula_core::types::id::{NotificationId, UserId};
use aula_entity::notification::kind::NotificationSeverity;
use aula_entity::notification::model::{NewNotification, Notification};

use super::feed::{self, FeedAction, FeedState, Undo};

/// Holds the local notification feed and exposes the mutating
/// operations.
///
/// Every caller-facing mutation applies to local state first, then
/// confirms against the backend; on failure the optimistic change is
/// rolled back and an error toast is shown. Remote row changes are
/// authoritative and apply directly.
#[derive(Debug)]
pub struct NotificationCenter {
    /// Feed configuration.
    config: NotificationsConfig,
    /// Backend gateway.
    gateway: Arc<dyn NotificationGateway>,
    /// Toast surface.
    notifier: Arc<dyn UiNotifier>,
    /// Observable feed state.
    state: watch::Sender<FeedState>,
    /// The user whose feed this is; `None` while signed out.
    user: watch::Sender<Option<UserId>>,
}

impl NotificationCenter {
    /// Create a new, empty center.
    pub fn new(
        config: NotificationsConfig,
        gateway: Arc<dyn NotificationGateway>,
        notifier: Arc<dyn UiNotifier>,
    ) -> Self {
        Self {
            config,
            gateway,
            notifier,
            state: watch::channel(FeedState::empty()).0,
            user: watch::channel(None).0,
        }
    }

    /// The current feed snapshot.
    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Receiver tracking feed state.
    pub fn watch_state(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// The current unread count.
    pub fn unread_count(&self) -> u64 {
        self.state.borrow().unread_count
    }

    /// Load the user's feed from the backend and adopt the user.
    pub async fn load(&self, user: UserId) -> aula_core::AppResult<()> {
        self.user.send_replace(Some(user));
        let notifications = self.gateway.list(user).await?;
        let unread_count = self.gateway.unread_count(user).await?;
        self.state
            .send_replace(FeedState::from_parts(notifications, unread_count));
        Ok(())
    }

    /// Re-fetch the feed without changing the user.
    pub async fn refresh(&self) -> aula_core::AppResult<()> {
        let Some(user) = *self.user.borrow() else {
            return Ok(());
        };
        self.load(user).await
    }

    /// Drop all local state on sign-out.
    pub fn reset(&self) {
        self.user.send_replace(None);
        self.state.send_replace(FeedState::empty());
    }

    /// Mark one notification as read.
    pub async fn mark_as_read(&self, id: NotificationId) {
        let Some(user) = *self.user.borrow() else {
            return;
        };

        let undo = self.apply(FeedAction::MarkRead { id });
        if let Err(e) = self.gateway.mark_read(id, user).await {
            tracing::error!("Failed to mark notification {id} as read: {e}");
            self.rollback(undo);
            self.notifier
                .toast(Toast::error("Failed to mark notification as read"));
        }
    }

    /// Mark every notification as read.
    pub async fn mark_all_as_read(&self) {
        let Some(user) = *self.user.borrow() else {
            return;
        };

        let undo = self.apply(FeedAction::MarkAllRead);
        match self.gateway.mark_all_read(user).await {
            Ok(()) => {
                self.notifier
                    .toast(Toast::success("All notifications marked as read"));
            }
            Err(e) => {
                tracing::error!("Failed to mark all notifications as read: {e}");
                self.rollback(undo);
                self.notifier
                    .toast(Toast::error("Failed to mark all notifications as read"));
            }
        }
    }

    /// Delete one notification.
    pub async fn delete(&self, id: NotificationId) {
        let Some(user) = *self.user.borrow() else {
            return;
        };

        let undo = self.apply(FeedAction::Delete { id });
        match self.gateway.delete(id, user).await {
            Ok(()) => {
                self.notifier.toast(Toast::success("Notification deleted"));
            }
            Err(e) => {
                tracing::error!("Failed to delete notification {id}: {e}");
                self.rollback(undo);
                self.notifier
                    .toast(Toast::error("Failed to delete notification"));
            }
        }
    }

    /// Delete every notification.
    pub async fn clear_all(&self) {
        let Some(user) = *self.user.borrow() else {
            return;
        };

        let undo = self.apply(FeedAction::ClearAll);
        match self.gateway.clear_all(user).await {
            Ok(()) => {
                self.notifier
                    .toast(Toast::success("All notifications cleared"));
            }
            Err(e) => {
                tracing::error!("Failed to clear notifications: {e}");
                self.rollback(undo);
                self.notifier
                    .toast(Toast::error("Failed to clear notifications"));
            }
        }
    }

    /// Create a notification.
    ///
    /// A provisional row is prepended immediately and replaced by the
    /// backend's version once the create confirms.
    pub async fn create(&self, new: NewNotification) {
        if self.user.borrow().is_none() {
            return;
        }

        let provisional = Notification {
            id: NotificationId::new(),
            user_id: new.user_id,
            title: new.title.clone(),
            message: new.message.clone(),
            severity: new.severity,
            kind: new.kind,
            read: false,
            action_url: new.action_url.clone(),
            action_data: new.action_data.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let provisional_id = provisional.id;

        let undo = self.apply(FeedAction::Create {
            notification: provisional,
        });
        match self.gateway.create(new).await {
            Ok(confirmed) => {
                self.state
                    .send_modify(|state| feed::reconcile_create(state, provisional_id, confirmed));
            }
            Err(e) => {
                tracing::error!("Failed to create notification: {e}");
                self.rollback(undo);
                self.notifier
                    .toast(Toast::error("Failed to create notification"));
            }
        }
    }

    /// Apply a remote row change.
    pub fn handle_change(&self, change: RowChange) {
        match change {
            RowChange::Insert { notification } => {
                if self.state.borrow().contains(notification.id) {
                    return;
                }
                let toast = self.insert_toast(&notification);
                self.apply(FeedAction::RemoteInsert { notification });
                if let Some(toast) = toast {
                    self.notifier.toast(toast);
                }
            }
            RowChange::Update { notification } => {
                self.apply(FeedAction::RemoteUpdate { notification });
            }
            RowChange::Delete { id } => {
                self.apply(FeedAction::RemoteDelete { id });
            }
        }
    }

    fn insert_toast(&self, notification: &Notification) -> Option<Toast> {
        let category = notification.category();
        if self
            .config
            .muted_categories
            .iter()
            .any(|muted| muted == category)
        {
            return None;
        }

        let level = match notification.severity {
            NotificationSeverity::Info => ToastLevel::Info,
            NotificationSeverity::Success => ToastLevel::Success,
            NotificationSeverity::Warning => ToastLevel::Warning,
            NotificationSeverity::Error => ToastLevel::Error,
        };
        Some(Toast::new(level, notification.title.clone()).with_description(
            notification.message.clone(),
        ))
    }

    fn apply(&self, action: FeedAction) -> Undo {
        let mut undo = Undo::None;
        self.state
            .send_modify(|state| undo = feed::apply(state, action.clone()));
        undo
    }

    fn rollback(&self, undo: Undo) {
        self.state
            .send_modify(|state| feed::revert(state, undo.clone()));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use aula_core::{AppError, AppResult};
    use aula_entity::notification::kind::NotificationKind;

    use super::*;

    #[derive(Debug, Default)]
    struct FakeGateway {
        notifications: Mutex<Vec<Notification>>,
        fail_mutations: AtomicBool,
    }

    impl FakeGateway {
        fn check(&self) -> AppResult<()> {
            if self.fail_mutations.load(Ordering::SeqCst) {
                Err(AppError::backend("mutation rejected"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl NotificationGateway for FakeGateway {
        async fn list(&self, _user: UserId) -> AppResult<Vec<Notification>> {
            Ok(self.notifications.lock().unwrap().clone())
        }

        async fn unread_count(&self, _user: UserId) -> AppResult<u64> {
            Ok(self
                .notifications
                .lock()
                .unwrap()
                .iter()
                .filter(|n| !n.read)
                .count() as u64)
        }

        async fn mark_read(&self, _id: NotificationId, _user: UserId) -> AppResult<()> {
            self.check()
        }

        async fn mark_all_read(&self, _user: UserId) -> AppResult<()> {
            self.check()
        }

        async fn delete(&self, _id: NotificationId, _user: UserId) -> AppResult<()> {
            self.check()
        }

        async fn clear_all(&self, _user: UserId) -> AppResult<()> {
            self.check()
        }

        async fn create(&self, new: NewNotification) -> AppResult<Notification> {
            self.check()?;
            Ok(Notification {
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
            })
        }
    }

    #[derive(Debug, Default)]
    struct FakeNotifier {
        toasts: Mutex<Vec<Toast>>,
    }

    impl UiNotifier for FakeNotifier {
        fn toast(&self, toast: Toast) {
            self.toasts.lock().unwrap().push(toast);
        }
    }

    fn notification(user: UserId, read: bool, kind: NotificationKind) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_id: user,
            title: "New discussion".to_string(),
            message: "Someone started a thread".to_string(),
            severity: NotificationSeverity::Info,
            kind,
            read,
            action_url: None,
            action_data: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    async fn loaded_center() -> (Arc<NotificationCenter>, Arc<FakeGateway>, Arc<FakeNotifier>, UserId)
    {
        let user = UserId::new();
        let gateway = Arc::new(FakeGateway::default());
        gateway.notifications.lock().unwrap().extend([
            notification(user, false, NotificationKind::NewDiscussion),
            notification(user, false, NotificationKind::AssignmentDue),
            notification(user, true, NotificationKind::QuizGraded),
        ]);
        let notifier = Arc::new(FakeNotifier::default());
        let center = Arc::new(NotificationCenter::new(
            NotificationsConfig::default(),
            gateway.clone(),
            notifier.clone(),
        ));
        center.load(user).await.expect("load");
        (center, gateway, notifier, user)
    }

    #[tokio::test]
    async fn test_load_populates_feed() {
        let (center, _, _, _) = loaded_center().await;
        let state = center.snapshot();
        assert_eq!(state.notifications.len(), 3);
        assert_eq!(state.unread_count, 2);
        assert!(state.invariant_holds());
    }

    #[tokio::test]
    async fn test_mark_as_read_applies_optimistically() {
        let (center, _, notifier, _) = loaded_center().await;
        let id = center.snapshot().notifications[0].id;

        center.mark_as_read(id).await;

        let state = center.snapshot();
        assert_eq!(state.unread_count, 1);
        assert!(state.invariant_holds());
        assert!(notifier.toasts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_rolls_back_and_toasts() {
        let (center, gateway, notifier, _) = loaded_center().await;
        gateway.fail_mutations.store(true, Ordering::SeqCst);
        let id = center.snapshot().notifications[0].id;

        center.mark_as_read(id).await;

        let state = center.snapshot();
        assert_eq!(state.unread_count, 2);
        assert!(state.invariant_holds());
        let toasts = notifier.toasts.lock().unwrap();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn test_delete_failure_restores_notification() {
        let (center, gateway, notifier, _) = loaded_center().await;
        gateway.fail_mutations.store(true, Ordering::SeqCst);
        let id = center.snapshot().notifications[1].id;

        center.delete(id).await;

        let state = center.snapshot();
        assert_eq!(state.notifications.len(), 3);
        assert_eq!(state.notifications[1].id, id);
        assert!(state.invariant_holds());
        assert_eq!(notifier.toasts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_replaces_provisional_with_confirmed() {
        let (center, _, _, user) = loaded_center().await;

        center
            .create(NewNotification {
                user_id: user,
                title: "Quiz graded".to_string(),
                message: "Your quiz 2 score is ready".to_string(),
                severity: NotificationSeverity::Success,
                kind: NotificationKind::QuizGraded,
                action_url: None,
                action_data: None,
            })
            .await;

        let state = center.snapshot();
        assert_eq!(state.notifications.len(), 4);
        assert_eq!(state.unread_count, 3);
        assert_eq!(state.notifications[0].title, "Quiz graded");
        assert!(state.invariant_holds());
    }

    #[tokio::test]
    async fn test_remote_insert_toasts_unless_muted() {
        let (center, _, notifier, user) = loaded_center().await;

        center.handle_change(RowChange::Insert {
            notification: notification(user, false, NotificationKind::NewMessage),
        });
        assert_eq!(notifier.toasts.lock().unwrap().len(), 1);

        let mut maintenance = notification(user, false, NotificationKind::SystemMaintenance);
        maintenance.title = "Scheduled downtime".to_string();
        center.handle_change(RowChange::Insert {
            notification: maintenance,
        });

        assert_eq!(notifier.toasts.lock().unwrap().len(), 1, "muted category");
        assert_eq!(center.unread_count(), 4);
        assert!(center.snapshot().invariant_holds());
    }

    #[tokio::test]
    async fn test_reset_clears_feed() {
        let (center, _, _, _) = loaded_center().await;
        center.reset();

        let state = center.snapshot();
        assert!(state.notifications.is_empty());
        assert_eq!(state.unread_count, 0);

        // Operations while signed out are no-ops.
        center.mark_all_as_read().await;
        assert!(center.snapshot().notifications.is_empty());
    }
}
