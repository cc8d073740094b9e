//! Catalog product snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An embedded copy of the catalog fields captured when a product was added
/// to a device-resident collection.
///
/// The snapshot may go stale relative to the live catalog; nothing in the SDK
/// refreshes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Catalog product id
    pub id: u64,
    /// Display name
    pub name: String,
    /// Selling price
    pub price: Decimal,
    /// Maximum retail price
    pub mrp: Decimal,
    /// Primary image url
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductSnapshot {
    /// Create a new [`ProductSnapshot`]
    pub fn new(id: u64, name: impl Into<String>, price: Decimal, mrp: Decimal) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            mrp,
            image: None,
        }
    }
}
