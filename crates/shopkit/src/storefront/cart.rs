//! Authenticated cart and wishlist operations.

use shopkit_common::{
    AddCartRequest, AddWishlistRequest, CartItem, RecordId, UpdateCartRequest, WishlistItem,
};
use tracing::instrument;

use super::Storefront;
use crate::error::Error;

impl Storefront {
    /// Server cart for the authenticated user; refreshes the badge count
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<Vec<CartItem>, Error> {
        let items = self.client.get_cart().await?;
        self.state.set_cart_count(items.len() as u32);
        Ok(items)
    }

    /// Create a record in the server cart
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, product_id: u64, quantity: u32) -> Result<CartItem, Error> {
        self.client
            .post_cart_item(AddCartRequest {
                product_id,
                quantity,
            })
            .await
    }

    /// Overwrite the quantity of a server cart record
    #[instrument(skip(self))]
    pub async fn update_cart_quantity(&self, id: RecordId, quantity: u32) -> Result<CartItem, Error> {
        let RecordId::Persisted(id) = id else {
            return Err(Error::Custom(
                "cannot update a cart record the server has not created".to_string(),
            ));
        };

        self.client
            .put_cart_item(id, UpdateCartRequest { quantity })
            .await
    }

    /// Server wishlist for the authenticated user
    #[instrument(skip(self))]
    pub async fn wishlist(&self) -> Result<Vec<WishlistItem>, Error> {
        self.client.get_wishlist().await
    }

    /// Create a record in the server wishlist
    #[instrument(skip(self))]
    pub async fn add_to_wishlist(&self, product_id: u64) -> Result<WishlistItem, Error> {
        self.client
            .post_wishlist_item(AddWishlistRequest { product_id })
            .await
    }
}
