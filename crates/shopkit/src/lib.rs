//! # Shopkit SDK
//!
//! Client SDK for a mobile storefront. It covers the three concerns a
//! storefront app cannot leave to screens:
//!
//! - a guest (device-resident) cart and wishlist for unauthenticated
//!   browsing, backed by pluggable key-value storage;
//! - a one-time reconciliation of that guest data into the server-side
//!   account when the user logs in, without loss or duplication;
//! - a coin-wallet redemption calculator whose single implementation serves
//!   both the live checkout preview and the values frozen into the order.
//!
//! The [`Storefront`] handle ties these together over a
//! [`StorefrontConnector`], typically the bundled [`HttpClient`].

pub mod client;
pub mod error;
pub mod guest;
pub mod redemption;
pub mod state;
pub mod storefront;

pub use client::{HttpClient, StorefrontConnector};
pub use error::Error;
pub use guest::GuestStore;
pub use redemption::compute_redemption;
// re-exporting external crates
pub use shopkit_common as common;
pub use shopkit_common::{Coins, StoreUrl};
pub use state::{AppState, AuthSession};
pub use storefront::{CheckoutSession, ReconcileOutcome, Storefront};
