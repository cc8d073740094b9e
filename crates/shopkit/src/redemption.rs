//! Coin redemption arithmetic.
//!
//! One pure function serves both the live checkout preview and the values
//! frozen into the order payload at submission; there is no second
//! implementation anywhere, so the two cannot diverge.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use shopkit_common::{Coins, RedemptionResult, WalletPolicy};

/// Maximum coins applicable to `subtotal` under `policy`, and the discount
/// they are worth.
///
/// Not applicable when the balance or subtotal is empty, the policy is absent
/// or fails validation, or the subtotal is below the policy's minimum cart
/// value. The coin count is bounded by the balance, the policy's hard cap,
/// and `floor(subtotal * max_usage_percentage / 100 / ratio)`; the discount
/// is the coin value rounded to two decimals.
pub fn compute_redemption(
    subtotal: Decimal,
    balance: Coins,
    policy: Option<&WalletPolicy>,
) -> RedemptionResult {
    let Some(policy) = policy else {
        return RedemptionResult::not_applicable();
    };

    if balance.is_zero() || subtotal <= Decimal::ZERO {
        return RedemptionResult::not_applicable();
    }

    if subtotal < policy.min_cart_value {
        return RedemptionResult::not_applicable();
    }

    if !policy.is_valid() {
        return RedemptionResult::not_applicable();
    }

    let max_discount_by_percentage = subtotal * policy.max_usage_percentage / Decimal::ONE_HUNDRED;
    let max_coins_by_percentage = (max_discount_by_percentage / policy.coin_to_currency_ratio)
        .floor()
        .to_u64()
        .unwrap_or(0);

    let coins_to_use = u64::from(balance)
        .min(u64::from(policy.max_redeemable_coins))
        .min(max_coins_by_percentage);

    let discount = (Decimal::from(coins_to_use) * policy.coin_to_currency_ratio)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    RedemptionResult {
        coins_to_use: Coins::from(coins_to_use),
        discount,
        applicable: coins_to_use > 0 && discount > Decimal::ZERO,
    }
}
