//! Storefront SDK handle.

use std::str::FromStr;
use std::sync::Arc;

use shopkit_common::database::KVStore;
use shopkit_common::StoreUrl;
use tracing::instrument;

use crate::client::{HttpClient, StorefrontConnector};
use crate::error::Error;
use crate::guest::GuestStore;
use crate::state::{AppState, AuthSession};

mod cart;
mod checkout;
mod reconcile;
mod wallet;

pub use checkout::CheckoutSession;
pub use reconcile::{merge_cart_items, merge_wishlist_items, ReconcileOutcome};

/// Shopkit Storefront
///
/// High level handle over one storefront deployment: the guest store for
/// unauthenticated browsing, the remote cart/wishlist/wallet, and the shared
/// application state.
#[derive(Debug, Clone)]
pub struct Storefront {
    /// Base url of the storefront deployment
    pub store_url: StoreUrl,
    /// Guest (device-resident) store
    pub guest: GuestStore,
    /// Shared application state
    pub state: Arc<AppState>,
    client: Arc<dyn StorefrontConnector + Send + Sync>,
}

impl Storefront {
    /// Create new [`Storefront`]
    ///
    /// # Synopsis
    /// ```rust,no_run
    /// use std::sync::Arc;
    ///
    /// use shopkit::Storefront;
    /// use shopkit_common::database::MemoryKVStore;
    ///
    /// let localstore = MemoryKVStore::new();
    /// let storefront = Storefront::new("https://shop.example.com/api", Arc::new(localstore));
    /// ```
    pub fn new(store_url: &str, localstore: Arc<dyn KVStore + Send + Sync>) -> Result<Self, Error> {
        let store_url = StoreUrl::from_str(store_url)?;
        let client = Arc::new(HttpClient::new(store_url.clone())?);

        Ok(Self {
            store_url,
            guest: GuestStore::new(localstore),
            state: Arc::new(AppState::new()),
            client,
        })
    }

    /// Change connector (tests, alternative transports)
    pub fn set_client<C: StorefrontConnector + 'static + Send + Sync>(&mut self, client: C) {
        self.client = Arc::new(client);
    }

    /// Login-success entry point.
    ///
    /// Stores the session, then runs the one-time guest reconciliation before
    /// the authenticated session is treated as ready.
    #[instrument(skip(self, session))]
    pub async fn handle_login(&self, session: AuthSession) -> Result<ReconcileOutcome, Error> {
        self.state.on_login(session);
        self.reconcile_on_login().await
    }

    /// Logout teardown: clears the session and resets the badge
    pub fn logout(&self) {
        self.state.on_logout();
    }

    /// Focus-event refresh of the cart badge.
    ///
    /// Authenticated sessions re-read the server cart; guests count the
    /// device-resident cart. Failures only log; the badge keeps its last
    /// value.
    #[instrument(skip(self))]
    pub async fn refresh_on_focus(&self) {
        if self.state.is_authenticated() {
            if let Err(err) = self.cart().await {
                tracing::warn!("Could not refresh cart count: {}", err);
            }
        } else {
            let count = self.guest.cart_items().await.len() as u32;
            self.state.set_cart_count(count);
        }
    }
}
