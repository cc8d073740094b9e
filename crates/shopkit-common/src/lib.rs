//! Shopkit shared types and traits.
//!
//! This crate is the base foundation to build things that can interact with the
//! storefront SDK and its internal crates.
//!
//! It holds the wire model of the storefront API (products, cart, wishlist,
//! wallet), the device storage traits, and the shared error types.

pub mod cart;
pub mod coins;
pub mod database;
pub mod error;
pub mod product;
pub mod serde_utils;
pub mod store_url;
pub mod wallet;

pub use cart::{
    AddCartRequest, AddWishlistRequest, CartItem, GuestCartItem, GuestWishlistItem, RecordId,
    UpdateCartRequest, WishlistItem,
};
pub use coins::Coins;
pub use error::ErrorResponse;
pub use product::ProductSnapshot;
pub use store_url::StoreUrl;
pub use wallet::{
    RedeemRequest, RedemptionResult, ReferenceType, ValidateRedemptionRequest,
    ValidateRedemptionResponse, WalletBalance, WalletPolicy,
};

/// Return the given error if the condition does not hold.
#[macro_export]
macro_rules! ensure_shopkit {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}
