//! Cart and wishlist types.
//!
//! Guest variants live on the device only; `CartItem` and `WishlistItem` are
//! the server-side records. A record that reconciliation has computed but the
//! server has not yet created carries [`RecordId::Pending`], which travels as
//! the wire sentinel `0`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::ProductSnapshot;

/// Server identity of a cart or wishlist record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordId {
    /// Not yet created on the server
    #[default]
    Pending,
    /// Server-assigned identity
    Persisted(u64),
}

impl RecordId {
    const PENDING_SENTINEL: u64 = 0;

    /// Build from the raw wire value, mapping the `0` sentinel to `Pending`
    pub fn from_raw(raw: u64) -> Self {
        if raw == Self::PENDING_SENTINEL {
            Self::Pending
        } else {
            Self::Persisted(raw)
        }
    }

    /// Raw wire value; `Pending` becomes the `0` sentinel
    pub fn as_raw(&self) -> u64 {
        match self {
            Self::Pending => Self::PENDING_SENTINEL,
            Self::Persisted(id) => *id,
        }
    }

    /// Whether the record has no server identity yet
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.as_raw())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        Ok(RecordId::from_raw(raw))
    }
}

/// A guest (device-resident) cart entry, unique per `product.id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestCartItem {
    /// Product snapshot captured at add time
    pub product: ProductSnapshot,
    /// Quantity, at least 1 on creation
    pub quantity: u32,
}

/// A guest (device-resident) wishlist entry, unique per `product_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestWishlistItem {
    /// Catalog product id
    pub product_id: u64,
    /// Product snapshot captured at add time
    pub product: ProductSnapshot,
    /// When the guest added the product
    pub date_added: DateTime<Utc>,
}

/// A server-side cart record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Server identity
    pub id: RecordId,
    /// Owning user, `0` until the record is created server-side
    pub user_id: u64,
    /// Product snapshot
    pub product: ProductSnapshot,
    /// Quantity
    pub quantity: u32,
}

impl CartItem {
    /// A cart record computed locally but not yet created on the server
    pub fn pending(product: ProductSnapshot, quantity: u32) -> Self {
        Self {
            id: RecordId::Pending,
            user_id: 0,
            product,
            quantity,
        }
    }
}

/// A server-side wishlist record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    /// Server identity
    pub id: RecordId,
    /// Owning user, `0` until the record is created server-side
    pub user_id: u64,
    /// Catalog product id
    pub product_id: u64,
    /// Product snapshot
    pub product: ProductSnapshot,
    /// When the product was wishlisted; guest timestamps survive reconciliation
    pub date_added: DateTime<Utc>,
}

impl WishlistItem {
    /// A wishlist record computed locally but not yet created on the server
    pub fn pending(item: GuestWishlistItem) -> Self {
        Self {
            id: RecordId::Pending,
            user_id: 0,
            product_id: item.product_id,
            product: item.product,
            date_added: item.date_added,
        }
    }
}

/// Body of `POST /cart`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartRequest {
    /// Catalog product id
    pub product_id: u64,
    /// Quantity to create the record with
    pub quantity: u32,
}

/// Body of `PUT /cart/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    /// New quantity
    pub quantity: u32,
}

/// Body of `POST /wishlist`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistRequest {
    /// Catalog product id
    pub product_id: u64,
}
