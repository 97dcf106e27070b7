//! Pure feed state machine.
//!
//! Invariant: `unread_count` always equals the number of notifications
//! in the list with `read == false`. Every mutation path (optimistic
//! local actions, their rollbacks, and remote row changes) maintains
//! it in lockstep.

use aula_core::types::id::NotificationId;
use aula_entity::notification::model::Notification;

/// Local feed state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedState {
    /// Notifications, newest first.
    pub notifications: Vec<Notification>,
    /// Count of unread notifications.
    pub unread_count: u64,
}

impl FeedState {
    /// An empty feed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a feed from a loaded list and unread count.
    pub fn from_parts(notifications: Vec<Notification>, unread_count: u64) -> Self {
        Self {
            notifications,
            unread_count,
        }
    }

    /// Whether a notification with this id is present.
    pub fn contains(&self, id: NotificationId) -> bool {
        self.notifications.iter().any(|n| n.id == id)
    }

    /// Check the unread-count invariant.
    pub fn invariant_holds(&self) -> bool {
        let unread = self.notifications.iter().filter(|n| !n.read).count() as u64;
        self.unread_count == unread
    }
}

/// A feed mutation.
#[derive(Debug, Clone)]
pub enum FeedAction {
    /// Optimistic: mark one notification read.
    MarkRead {
        /// Target notification.
        id: NotificationId,
    },
    /// Optimistic: mark every notification read.
    MarkAllRead,
    /// Optimistic: remove one notification.
    Delete {
        /// Target notification.
        id: NotificationId,
    },
    /// Optimistic: remove every notification.
    ClearAll,
    /// Optimistic: prepend a provisional just-created notification.
    Create {
        /// The provisional row, pending backend confirmation.
        notification: Notification,
    },
    /// Remote INSERT: prepend a new row.
    RemoteInsert {
        /// The inserted row.
        notification: Notification,
    },
    /// Remote UPDATE: replace the matching row.
    RemoteUpdate {
        /// The row after the update.
        notification: Notification,
    },
    /// Remote DELETE: remove the matching row.
    RemoteDelete {
        /// The deleted row's id.
        id: NotificationId,
    },
}

/// What it takes to revert an optimistic action.
///
/// Remote changes are authoritative and never reverted, so they
/// produce [`Undo::None`].
#[derive(Debug, Clone)]
pub enum Undo {
    /// Nothing to revert.
    None,
    /// Revert a single mark-read.
    MarkRead {
        /// Target notification.
        id: NotificationId,
        /// Whether it was already read before the action.
        was_read: bool,
    },
    /// Revert a mark-all-read.
    MarkAllRead {
        /// Ids that were unread before the action.
        previously_unread: Vec<NotificationId>,
    },
    /// Revert a single delete.
    Delete {
        /// The removed notification.
        notification: Notification,
        /// Its position before removal.
        index: usize,
    },
    /// Revert a clear-all.
    ClearAll {
        /// The full state before the action.
        previous: FeedState,
    },
    /// Revert a provisional create.
    Create {
        /// The provisional id.
        id: NotificationId,
    },
}

/// Apply an action to the state, returning what it takes to revert it.
pub fn apply(state: &mut FeedState, action: FeedAction) -> Undo {
    match action {
        FeedAction::MarkRead { id } => {
            let Some(notification) = state.notifications.iter_mut().find(|n| n.id == id) else {
                return Undo::None;
            };
            let was_read = notification.read;
            notification.read = true;
            if !was_read {
                state.unread_count = state.unread_count.saturating_sub(1);
            }
            Undo::MarkRead { id, was_read }
        }
        FeedAction::MarkAllRead => {
            let previously_unread: Vec<NotificationId> = state
                .notifications
                .iter()
                .filter(|n| !n.read)
                .map(|n| n.id)
                .collect();
            for notification in &mut state.notifications {
                notification.read = true;
            }
            state.unread_count = 0;
            Undo::MarkAllRead { previously_unread }
        }
        FeedAction::Delete { id } => {
            let Some(index) = state.notifications.iter().position(|n| n.id == id) else {
                return Undo::None;
            };
            let notification = state.notifications.remove(index);
            if !notification.read {
                state.unread_count = state.unread_count.saturating_sub(1);
            }
            Undo::Delete {
                notification,
                index,
            }
        }
        FeedAction::ClearAll => {
            let previous = std::mem::take(state);
            Undo::ClearAll { previous }
        }
        FeedAction::Create { notification } => {
            let id = notification.id;
            if !notification.read {
                state.unread_count += 1;
            }
            state.notifications.insert(0, notification);
            Undo::Create { id }
        }
        FeedAction::RemoteInsert { notification } => {
            // Realtime and polling can race; a row already present is
            // a duplicate, not a change.
            if state.contains(notification.id) {
                return Undo::None;
            }
            if !notification.read {
                state.unread_count += 1;
            }
            state.notifications.insert(0, notification);
            Undo::None
        }
        FeedAction::RemoteUpdate { notification } => {
            let Some(existing) = state
                .notifications
                .iter_mut()
                .find(|n| n.id == notification.id)
            else {
                return Undo::None;
            };
            match (existing.read, notification.read) {
                (false, true) => state.unread_count = state.unread_count.saturating_sub(1),
                (true, false) => state.unread_count += 1,
                _ => {}
            }
            *existing = notification;
            Undo::None
        }
        FeedAction::RemoteDelete { id } => {
            let Some(index) = state.notifications.iter().position(|n| n.id == id) else {
                return Undo::None;
            };
            let removed = state.notifications.remove(index);
            if !removed.read {
                state.unread_count = state.unread_count.saturating_sub(1);
            }
            Undo::None
        }
    }
}

/// Revert an optimistic action after the backend rejected it.
pub fn revert(state: &mut FeedState, undo: Undo) {
    match undo {
        Undo::None => {}
        Undo::MarkRead { id, was_read } => {
            if was_read {
                return;
            }
            if let Some(notification) = state.notifications.iter_mut().find(|n| n.id == id) {
                notification.read = false;
                state.unread_count += 1;
            }
        }
        Undo::MarkAllRead { previously_unread } => {
            let mut restored = 0;
            for id in previously_unread {
                if let Some(notification) = state.notifications.iter_mut().find(|n| n.id == id) {
                    notification.read = false;
                    restored += 1;
                }
            }
            state.unread_count += restored;
        }
        Undo::Delete {
            notification,
            index,
        } => {
            let index = index.min(state.notifications.len());
            if !notification.read {
                state.unread_count += 1;
            }
            state.notifications.insert(index, notification);
        }
        Undo::ClearAll { previous } => {
            *state = previous;
        }
        Undo::Create { id } => {
            if let Some(index) = state.notifications.iter().position(|n| n.id == id) {
                let removed = state.notifications.remove(index);
                if !removed.read {
                    state.unread_count = state.unread_count.saturating_sub(1);
                }
            }
        }
    }
}

/// Replace a provisional created row with the backend's version.
pub fn reconcile_create(
    state: &mut FeedState,
    provisional_id: NotificationId,
    confirmed: Notification,
) {
    let Some(existing) = state
        .notifications
        .iter_mut()
        .find(|n| n.id == provisional_id)
    else {
        // The provisional row is already gone (deleted or cleared
        // while the create was in flight); insert the confirmed row.
        apply(
            state,
            FeedAction::RemoteInsert {
                notification: confirmed,
            },
        );
        return;
    };

    match (existing.read, confirmed.read) {
        (false, true) => state.unread_count = state.unread_count.saturating_sub(1),
        (true, false) => state.unread_count += 1,
        _ => {}
    }
    *existing = confirmed;
}
