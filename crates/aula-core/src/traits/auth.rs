//! Authentication state capability.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::result::AppResult;
use crate::types::id::UserId;

/// Capability exposing the signed-in user and sign-out.
///
/// The coordination layer never stores credentials itself; it observes
/// the user transitioning between `Some` and `None` and tears its own
/// state down accordingly.
#[async_trait]
pub trait AuthState: Send + Sync + std::fmt::Debug + 'static {
    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<UserId>;

    /// The current session access token, if any.
    fn access_token(&self) -> Option<String>;

    /// Receiver tracking sign-in/sign-out transitions.
    fn user_changes(&self) -> watch::Receiver<Option<UserId>>;

    /// Sign the user out.
    async fn sign_out(&self) -> AppResult<()>;
}
