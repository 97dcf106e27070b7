//! Capability traits defined in `aula-core` and implemented by other
//! crates (or by test fakes).
//!
//! These abstract the host environment (connectivity, auth state, UI
//! surfaces, navigation) so the coordination layer never touches
//! process globals directly.

pub mod auth;
pub mod navigator;
pub mod notifier;
pub mod probe;

pub use auth::AuthState;
pub use navigator::Navigator;
pub use notifier::{Toast, ToastLevel, UiNotifier};
pub use probe::ConnectivityProbe;
