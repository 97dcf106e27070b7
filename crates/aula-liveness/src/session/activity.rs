//! Last-activity tracking for the local instance.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

/// Kind of user activity that resets the idle clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    /// Mouse press, move, or click.
    Pointer,
    /// Key press.
    Key,
    /// Scrolling.
    Scroll,
    /// Touch start.
    Touch,
}

/// A single observed activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityEvent {
    /// What kind of activity occurred.
    pub kind: ActivityKind,
    /// Whether the event originated from the expiry-warning surface.
    /// Interacting with the warning itself must not extend the session.
    pub from_warning_surface: bool,
}

impl ActivityEvent {
    /// An ordinary activity event of the given kind.
    pub fn of(kind: ActivityKind) -> Self {
        Self {
            kind,
            from_warning_surface: false,
        }
    }
}

/// Tracks when the user was last active in this instance.
///
/// Lock-free: the timestamp is stored as nanoseconds elapsed since the
/// tracker was created.
#[derive(Debug)]
pub struct ActivityTracker {
    /// Creation instant, the zero point for stored offsets.
    base: Instant,
    /// Nanoseconds from `base` to the latest activity.
    last_activity_nanos: AtomicU64,
}

impl ActivityTracker {
    /// Create a new tracker; creation counts as activity.
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            last_activity_nanos: AtomicU64::new(0),
        }
    }

    /// Record activity now.
    pub fn record(&self) {
        let nanos = self.base.elapsed().as_nanos() as u64;
        self.last_activity_nanos.store(nanos, Ordering::SeqCst);
    }

    /// How long the user has been idle.
    pub fn idle_duration(&self) -> Duration {
        let last = Duration::from_nanos(self.last_activity_nanos.load(Ordering::SeqCst));
        self.base.elapsed().saturating_sub(last)
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}
