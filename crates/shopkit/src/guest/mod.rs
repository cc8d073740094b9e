//! Guest (device-resident) cart and wishlist store.
//!
//! Each collection is one JSON array under a fixed key of the device KV
//! store, rewritten whole on every mutation. Storage failures never reach
//! the caller: they are logged and the operation reads as empty or leaves
//! state unchanged, so corrupted persisted bytes cannot wedge the app.
//! Stored-shape mismatches read as empty; there is no schema versioning.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shopkit_common::database::{
    self, KVStore, GUEST_CART_KEY, GUEST_NAMESPACE, GUEST_WISHLIST_KEY,
};
use shopkit_common::{GuestCartItem, GuestWishlistItem, ProductSnapshot};
use tracing::instrument;

/// Device-resident store for unauthenticated browsing.
///
/// Single logical owner at a time; the UI serializes user actions, so no
/// locking beyond the backend's own.
#[derive(Debug, Clone)]
pub struct GuestStore {
    store: Arc<dyn KVStore + Send + Sync>,
}

impl GuestStore {
    /// Create a new [`GuestStore`] over a device KV backend
    pub fn new(store: Arc<dyn KVStore + Send + Sync>) -> Self {
        Self { store }
    }

    async fn read_collection<T>(&self, key: &str) -> Result<Vec<T>, database::Error>
    where
        T: DeserializeOwned,
    {
        match self.store.kv_read(GUEST_NAMESPACE, key).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write_collection<T>(&self, key: &str, items: &[T]) -> Result<(), database::Error>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(items)?;
        self.store.kv_write(GUEST_NAMESPACE, key, &bytes).await
    }

    fn log_read_failure(key: &str, err: &database::Error) {
        tracing::warn!("Could not read guest {}: {}", key, err);
    }

    fn log_write_failure(key: &str, err: &database::Error) {
        tracing::warn!("Could not persist guest {}: {}", key, err);
    }

    /// Guest cart contents; storage failures read as an empty cart
    #[instrument(skip(self))]
    pub async fn cart_items(&self) -> Vec<GuestCartItem> {
        self.read_collection(GUEST_CART_KEY)
            .await
            .unwrap_or_else(|err| {
                Self::log_read_failure(GUEST_CART_KEY, &err);
                Vec::new()
            })
    }

    /// Guest wishlist contents; storage failures read as an empty wishlist
    #[instrument(skip(self))]
    pub async fn wishlist_items(&self) -> Vec<GuestWishlistItem> {
        self.read_collection(GUEST_WISHLIST_KEY)
            .await
            .unwrap_or_else(|err| {
                Self::log_read_failure(GUEST_WISHLIST_KEY, &err);
                Vec::new()
            })
    }

    /// Add `quantity` of a product to the guest cart.
    ///
    /// An existing entry for the same product has its quantity incremented;
    /// otherwise a new entry is appended.
    #[instrument(skip(self, product))]
    pub async fn add_cart_item(&self, product: ProductSnapshot, quantity: u32) {
        let mut items = self.cart_items().await;

        match items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => items.push(GuestCartItem { product, quantity }),
        }

        if let Err(err) = self.write_collection(GUEST_CART_KEY, &items).await {
            Self::log_write_failure(GUEST_CART_KEY, &err);
        }
    }

    /// Overwrite the quantity of a guest cart entry.
    ///
    /// No-op when the product is not in the cart. Quantities below 1 are
    /// written as given; removal is only ever explicit.
    #[instrument(skip(self))]
    pub async fn update_cart_quantity(&self, product_id: u64, quantity: u32) {
        let mut items = self.cart_items().await;

        let Some(item) = items.iter_mut().find(|item| item.product.id == product_id) else {
            return;
        };
        item.quantity = quantity;

        if let Err(err) = self.write_collection(GUEST_CART_KEY, &items).await {
            Self::log_write_failure(GUEST_CART_KEY, &err);
        }
    }

    /// Remove a product from the guest cart; absent products are ignored
    #[instrument(skip(self))]
    pub async fn remove_cart_item(&self, product_id: u64) {
        let mut items = self.cart_items().await;
        let before = items.len();
        items.retain(|item| item.product.id != product_id);

        if items.len() == before {
            return;
        }

        if let Err(err) = self.write_collection(GUEST_CART_KEY, &items).await {
            Self::log_write_failure(GUEST_CART_KEY, &err);
        }
    }

    /// Add a product to the guest wishlist.
    ///
    /// Idempotent: a product already wishlisted is left untouched and keeps
    /// the timestamp of its first add.
    #[instrument(skip(self, product))]
    pub async fn add_wishlist_item(&self, product: ProductSnapshot) {
        let mut items = self.wishlist_items().await;

        if items.iter().any(|item| item.product_id == product.id) {
            return;
        }

        items.push(GuestWishlistItem {
            product_id: product.id,
            product,
            date_added: Utc::now(),
        });

        if let Err(err) = self.write_collection(GUEST_WISHLIST_KEY, &items).await {
            Self::log_write_failure(GUEST_WISHLIST_KEY, &err);
        }
    }

    /// Remove a product from the guest wishlist; absent products are ignored
    #[instrument(skip(self))]
    pub async fn remove_wishlist_item(&self, product_id: u64) {
        let mut items = self.wishlist_items().await;
        let before = items.len();
        items.retain(|item| item.product_id != product_id);

        if items.len() == before {
            return;
        }

        if let Err(err) = self.write_collection(GUEST_WISHLIST_KEY, &items).await {
            Self::log_write_failure(GUEST_WISHLIST_KEY, &err);
        }
    }

    /// Erase the guest cart
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) {
        if let Err(err) = self.store.kv_remove(GUEST_NAMESPACE, GUEST_CART_KEY).await {
            Self::log_write_failure(GUEST_CART_KEY, &err);
        }
    }

    /// Erase the guest wishlist
    #[instrument(skip(self))]
    pub async fn clear_wishlist(&self) {
        if let Err(err) = self
            .store
            .kv_remove(GUEST_NAMESPACE, GUEST_WISHLIST_KEY)
            .await
        {
            Self::log_write_failure(GUEST_WISHLIST_KEY, &err);
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use shopkit_common::database::MemoryKVStore;

    use super::*;

    fn snapshot(id: u64) -> ProductSnapshot {
        ProductSnapshot::new(id, "soap", Decimal::new(4900, 2), Decimal::new(5900, 2))
    }

    fn store() -> GuestStore {
        GuestStore::new(Arc::new(MemoryKVStore::new()))
    }

    #[tokio::test]
    async fn cart_keeps_one_entry_per_product() {
        let guest = store();

        guest.add_cart_item(snapshot(1), 1).await;
        guest.add_cart_item(snapshot(1), 2).await;
        guest.add_cart_item(snapshot(2), 1).await;

        let items = guest.cart_items().await;
        assert_eq!(items.len(), 2);

        let first = items
            .iter()
            .find(|item| item.product.id == 1)
            .expect("product 1 present");
        assert_eq!(first.quantity, 3);
    }

    #[tokio::test]
    async fn update_quantity_overwrites_and_ignores_missing() {
        let guest = store();
        guest.add_cart_item(snapshot(1), 5).await;

        guest.update_cart_quantity(1, 2).await;
        guest.update_cart_quantity(99, 7).await;

        let items = guest.cart_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn update_quantity_zero_does_not_remove() {
        let guest = store();
        guest.add_cart_item(snapshot(1), 5).await;

        guest.update_cart_quantity(1, 0).await;

        let items = guest.cart_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 0);
    }

    #[tokio::test]
    async fn remove_cart_item_ignores_missing() {
        let guest = store();
        guest.add_cart_item(snapshot(1), 1).await;

        guest.remove_cart_item(99).await;
        assert_eq!(guest.cart_items().await.len(), 1);

        guest.remove_cart_item(1).await;
        assert!(guest.cart_items().await.is_empty());
    }

    #[tokio::test]
    async fn wishlist_add_is_idempotent_first_date_wins() {
        let guest = store();

        guest.add_wishlist_item(snapshot(7)).await;
        let first = guest.wishlist_items().await;
        assert_eq!(first.len(), 1);

        guest.add_wishlist_item(snapshot(7)).await;
        let second = guest.wishlist_items().await;
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].date_added, first[0].date_added);
    }

    #[tokio::test]
    async fn corrupted_bytes_read_as_empty() {
        let kv = Arc::new(MemoryKVStore::new());
        kv.kv_write(GUEST_NAMESPACE, GUEST_CART_KEY, b"not json")
            .await
            .expect("write");

        let guest = GuestStore::new(kv);
        assert!(guest.cart_items().await.is_empty());
    }

    #[tokio::test]
    async fn clear_erases_collections() {
        let guest = store();
        guest.add_cart_item(snapshot(1), 1).await;
        guest.add_wishlist_item(snapshot(2)).await;

        guest.clear_cart().await;
        guest.clear_wishlist().await;

        assert!(guest.cart_items().await.is_empty());
        assert!(guest.wishlist_items().await.is_empty());
    }
}
