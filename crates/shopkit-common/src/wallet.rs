//! Wallet types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coins::Coins;

/// Server-configured rules bounding coin redemption.
///
/// Fetched from `GET /wallet/settings`; every field arrives as a
/// decimal-bearing string and must parse before use. Read-only input to the
/// redemption calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletPolicy {
    /// Cart subtotal below which no redemption is allowed
    pub min_cart_value: Decimal,
    /// Currency value of a single coin, must be positive
    pub coin_to_currency_ratio: Decimal,
    /// Hard cap on coins spent in one order
    #[serde(with = "crate::serde_utils::coins_decimal_string")]
    pub max_redeemable_coins: Coins,
    /// Maximum share of the subtotal payable in coins, in percent
    pub max_usage_percentage: Decimal,
}

impl WalletPolicy {
    /// Whether the policy values are usable for redemption arithmetic
    pub fn is_valid(&self) -> bool {
        self.coin_to_currency_ratio > Decimal::ZERO
            && self.max_usage_percentage >= Decimal::ZERO
            && self.max_usage_percentage <= Decimal::ONE_HUNDRED
    }
}

/// Outcome of the redemption calculator.
///
/// Derived, never persisted; recomputed whenever subtotal, balance or policy
/// change. `discount` always equals `coins_to_use * coin_to_currency_ratio`
/// rounded to two decimals.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionResult {
    /// Coins that may be applied
    pub coins_to_use: Coins,
    /// Currency discount those coins are worth
    pub discount: Decimal,
    /// Whether redemption applies at all
    pub applicable: bool,
}

impl RedemptionResult {
    /// The empty, non-applicable result
    pub fn not_applicable() -> Self {
        Self {
            coins_to_use: Coins::ZERO,
            discount: Decimal::ZERO,
            applicable: false,
        }
    }
}

/// Response of `GET /wallet`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    /// Current coin balance
    pub balance: Coins,
}

/// Body of `POST /wallet/validate-redemption`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRedemptionRequest {
    /// Cart subtotal the redemption is measured against
    pub amount: Decimal,
    /// Requested coin spend
    pub coins_to_use: Coins,
    /// Category slugs of the products in the cart
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

/// Response of `POST /wallet/validate-redemption`.
///
/// Authoritative over the local calculator when the two disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRedemptionResponse {
    /// Whether the requested redemption is accepted
    pub valid: bool,
    /// Coins the server would apply
    #[serde(default)]
    pub coins_applicable: Coins,
    /// Discount the server would grant
    #[serde(default)]
    pub discount: Decimal,
    /// Human readable verdict, surfaced to the user on rejection
    #[serde(default)]
    pub message: String,
}

/// What a redeem call is booked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReferenceType {
    /// A placed order
    Order,
}

/// Body of `POST /wallet/redeem`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    /// Currency amount being redeemed
    pub amount: Decimal,
    /// Ledger reference kind
    pub reference_type: ReferenceType,
    /// Identity of the referenced order
    pub reference_id: String,
    /// Ledger line description
    pub description: String,
}
