//! Navigation capability.

use tokio::sync::watch;

/// Capability for observing and changing the current route.
pub trait Navigator: Send + Sync + std::fmt::Debug + 'static {
    /// The current route path, e.g. `/dashboard/courses/42/content`.
    fn current_path(&self) -> String;

    /// Navigate to `path`. When `replace` is true the current history
    /// entry is replaced instead of pushed.
    fn navigate(&self, path: &str, replace: bool);

    /// Receiver tracking route changes.
    fn route_changes(&self) -> watch::Receiver<String>;
}
