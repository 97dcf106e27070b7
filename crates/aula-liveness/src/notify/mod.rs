//! Notification feed.
//!
//! Keeps the per-user notification list and unread count current with
//! minimal latency: realtime row changes when the channel is up,
//! transparent fixed-interval polling when it is not. Local mutations
//! apply optimistically and roll back on backend failure.

pub mod center;
pub mod channel;
pub mod feed;

pub use center::NotificationCenter;
pub use channel::{RealtimeFeed, TransportMode};
pub use feed::{FeedAction, FeedState, Undo};
