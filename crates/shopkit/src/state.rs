//! Application state.
//!
//! The process-wide "current user" and cart badge count, modeled as an
//! explicit object with read, subscribe and update operations instead of an
//! ambient singleton. Created when the [`crate::Storefront`] handle is
//! built; refreshed on auth transitions and focus events; torn down on
//! logout.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Server user id
    pub user_id: u64,
    /// Login identifier, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Process-wide application state
#[derive(Debug)]
pub struct AppState {
    session: ArcSwapOption<AuthSession>,
    cart_count: watch::Sender<u32>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State for a fresh, unauthenticated process
    pub fn new() -> Self {
        let (cart_count, _) = watch::channel(0);

        Self {
            session: ArcSwapOption::empty(),
            cart_count,
        }
    }

    /// Currently authenticated session, if any
    pub fn current_session(&self) -> Option<Arc<AuthSession>> {
        self.session.load_full()
    }

    /// Whether a user is currently authenticated
    pub fn is_authenticated(&self) -> bool {
        self.session.load().is_some()
    }

    /// Current cart badge count
    pub fn cart_count(&self) -> u32 {
        *self.cart_count.borrow()
    }

    /// Subscribe to cart badge updates
    pub fn subscribe_cart_count(&self) -> watch::Receiver<u32> {
        self.cart_count.subscribe()
    }

    /// Publish a new cart badge count
    pub fn set_cart_count(&self, count: u32) {
        self.cart_count.send_replace(count);
    }

    /// Store the session on login success
    pub(crate) fn on_login(&self, session: AuthSession) {
        self.session.store(Some(Arc::new(session)));
    }

    /// Clear the session and badge on logout
    pub(crate) fn on_logout(&self) {
        self.session.store(None);
        self.cart_count.send_replace(0);
    }
}
