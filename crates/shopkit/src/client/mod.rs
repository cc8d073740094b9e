//! Storefront client

use std::fmt::Debug;

use async_trait::async_trait;
use shopkit_common::{
    AddCartRequest, AddWishlistRequest, CartItem, RedeemRequest, UpdateCartRequest,
    ValidateRedemptionRequest, ValidateRedemptionResponse, WalletBalance, WalletPolicy,
    WishlistItem,
};

use crate::error::Error;

pub mod http_client;

pub use http_client::HttpClient;

/// Interface that connects the SDK to a storefront deployment. Typically
/// represents an [`HttpClient`].
#[async_trait]
pub trait StorefrontConnector: Debug {
    /// Get the authenticated user's cart
    async fn get_cart(&self) -> Result<Vec<CartItem>, Error>;
    /// Create a cart record
    async fn post_cart_item(&self, request: AddCartRequest) -> Result<CartItem, Error>;
    /// Update a cart record's quantity
    async fn put_cart_item(&self, id: u64, request: UpdateCartRequest) -> Result<CartItem, Error>;
    /// Get the authenticated user's wishlist
    async fn get_wishlist(&self) -> Result<Vec<WishlistItem>, Error>;
    /// Create a wishlist record
    async fn post_wishlist_item(&self, request: AddWishlistRequest) -> Result<WishlistItem, Error>;
    /// Get the wallet coin balance
    async fn get_wallet_balance(&self) -> Result<WalletBalance, Error>;
    /// Get the wallet redemption policy
    async fn get_wallet_policy(&self) -> Result<WalletPolicy, Error>;
    /// Ask the server to confirm a requested redemption before it is applied
    async fn post_validate_redemption(
        &self,
        request: ValidateRedemptionRequest,
    ) -> Result<ValidateRedemptionResponse, Error>;
    /// Book redeemed coins against a placed order
    async fn post_redeem(&self, request: RedeemRequest) -> Result<(), Error>;
}
