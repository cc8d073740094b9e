//! Guest reconciliation.
//!
//! Runs once per successful authentication, folding the guest cart and
//! wishlist into the server's records. The merge itself is pure and
//! in-memory; it is bracketed by the concurrent server fetches before it and
//! the per-item pushes after it. Each guest collection is cleared as soon as
//! its merge is computed, before any push: a rerun cannot apply guest data
//! twice, at the cost of losing it when a later push fails.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use shopkit_common::{
    AddCartRequest, AddWishlistRequest, CartItem, GuestCartItem, GuestWishlistItem, RecordId,
    UpdateCartRequest, WishlistItem,
};
use tracing::instrument;

use super::Storefront;
use crate::error::Error;

/// Summary of a reconciliation run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Cart records created on the server
    pub cart_created: usize,
    /// Cart records whose quantity was raised
    pub cart_updated: usize,
    /// Wishlist records created on the server
    pub wishlist_created: usize,
    /// Pushes that failed and were dropped
    pub failed: usize,
}

/// Merge guest cart entries into the server cart.
///
/// An entry present on both sides keeps the higher of the two quantities, so
/// neither guest nor server intent is lost and a repeated merge cannot
/// inflate it. Guest-only entries are appended as [`RecordId::Pending`].
pub fn merge_cart_items(
    mut server_items: Vec<CartItem>,
    guest_items: Vec<GuestCartItem>,
) -> Vec<CartItem> {
    let mut by_product: HashMap<u64, usize> = server_items
        .iter()
        .enumerate()
        .map(|(idx, item)| (item.product.id, idx))
        .collect();

    for guest in guest_items {
        match by_product.get(&guest.product.id) {
            Some(&idx) => {
                let item = &mut server_items[idx];
                item.quantity = item.quantity.max(guest.quantity);
            }
            None => {
                by_product.insert(guest.product.id, server_items.len());
                server_items.push(CartItem::pending(guest.product, guest.quantity));
            }
        }
    }

    server_items
}

/// Merge guest wishlist entries into the server wishlist.
///
/// Products already wishlisted server-side are skipped; appended entries keep
/// the guest `date_added`.
pub fn merge_wishlist_items(
    mut server_items: Vec<WishlistItem>,
    guest_items: Vec<GuestWishlistItem>,
) -> Vec<WishlistItem> {
    let mut present: HashSet<u64> = server_items.iter().map(|item| item.product_id).collect();

    for guest in guest_items {
        if present.insert(guest.product_id) {
            server_items.push(WishlistItem::pending(guest));
        }
    }

    server_items
}

impl Storefront {
    /// Fold the guest cart into `server_items` and clear the guest cart.
    ///
    /// The returned list is the desired server end state; pushing it is the
    /// caller's concern.
    pub async fn merge_cart(&self, server_items: Vec<CartItem>) -> Vec<CartItem> {
        let guest_items = self.guest.cart_items().await;
        let merged = merge_cart_items(server_items, guest_items);
        self.guest.clear_cart().await;
        merged
    }

    /// Fold the guest wishlist into `server_items` and clear the guest
    /// wishlist.
    pub async fn merge_wishlist(&self, server_items: Vec<WishlistItem>) -> Vec<WishlistItem> {
        let guest_items = self.guest.wishlist_items().await;
        let merged = merge_wishlist_items(server_items, guest_items);
        self.guest.clear_wishlist().await;
        merged
    }

    /// The one-time post-login reconciliation.
    ///
    /// Fetches the server cart and wishlist concurrently, merges the guest
    /// collections in, then pushes every [`RecordId::Pending`] entry as a
    /// create and every changed quantity as an update. Pushes run
    /// independently per item; a failure is logged and counted, never
    /// blocking the others or rolling back the already-cleared guest store.
    #[instrument(skip(self))]
    pub async fn reconcile_on_login(&self) -> Result<ReconcileOutcome, Error> {
        let (cart_res, wishlist_res) = tokio::join!(self.client.get_cart(), self.client.get_wishlist());
        let server_cart = cart_res?;
        let server_wishlist = wishlist_res?;

        // Quantities as the server held them, to push only real changes.
        let original: HashMap<u64, u32> = server_cart
            .iter()
            .filter_map(|item| match item.id {
                RecordId::Persisted(id) => Some((id, item.quantity)),
                RecordId::Pending => None,
            })
            .collect();

        let merged_cart = self.merge_cart(server_cart).await;
        let merged_wishlist = self.merge_wishlist(server_wishlist).await;

        let mut creates = Vec::new();
        let mut updates = Vec::new();
        for item in &merged_cart {
            match item.id {
                RecordId::Pending => creates.push(AddCartRequest {
                    product_id: item.product.id,
                    quantity: item.quantity,
                }),
                RecordId::Persisted(id) => {
                    if original.get(&id).copied() != Some(item.quantity) {
                        updates.push((
                            id,
                            item.product.id,
                            UpdateCartRequest {
                                quantity: item.quantity,
                            },
                        ));
                    }
                }
            }
        }

        let wishlist_creates: Vec<AddWishlistRequest> = merged_wishlist
            .iter()
            .filter(|item| item.id.is_pending())
            .map(|item| AddWishlistRequest {
                product_id: item.product_id,
            })
            .collect();

        let mut outcome = ReconcileOutcome::default();

        for result in join_all(creates.into_iter().map(|request| async move {
            let product_id = request.product_id;
            self.client
                .post_cart_item(request)
                .await
                .map_err(|err| (product_id, err))
        }))
        .await
        {
            match result {
                Ok(_) => outcome.cart_created += 1,
                Err((product_id, err)) => {
                    tracing::warn!("Could not push guest cart item {}: {}", product_id, err);
                    outcome.failed += 1;
                }
            }
        }

        for result in join_all(updates.into_iter().map(|(id, product_id, request)| async move {
            self.client
                .put_cart_item(id, request)
                .await
                .map_err(|err| (product_id, err))
        }))
        .await
        {
            match result {
                Ok(_) => outcome.cart_updated += 1,
                Err((product_id, err)) => {
                    tracing::warn!("Could not update cart quantity for {}: {}", product_id, err);
                    outcome.failed += 1;
                }
            }
        }

        for result in join_all(wishlist_creates.into_iter().map(|request| async move {
            let product_id = request.product_id;
            self.client
                .post_wishlist_item(request)
                .await
                .map_err(|err| (product_id, err))
        }))
        .await
        {
            match result {
                Ok(_) => outcome.wishlist_created += 1,
                Err((product_id, err)) => {
                    tracing::warn!("Could not push guest wishlist item {}: {}", product_id, err);
                    outcome.failed += 1;
                }
            }
        }

        self.state.set_cart_count(merged_cart.len() as u32);

        Ok(outcome)
    }
}
