//! Checkout redemption session.

use rust_decimal::Decimal;
use shopkit_common::{Coins, RedemptionResult, ValidateRedemptionResponse, WalletPolicy};

use crate::redemption::compute_redemption;

/// Live redemption state for a checkout screen.
///
/// The session recomputes on every subtotal, balance or policy change and on
/// nothing else. The "use wallet" toggle only decides whether the computed
/// result is applied to the total; it never recalculates. Preview and order
/// submission both read the same [`RedemptionResult`], so they cannot
/// diverge.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    subtotal: Decimal,
    balance: Coins,
    policy: Option<WalletPolicy>,
    use_wallet: bool,
    redemption: RedemptionResult,
    server_message: Option<String>,
}

impl CheckoutSession {
    /// Open a session with the current inputs
    pub fn new(subtotal: Decimal, balance: Coins, policy: Option<WalletPolicy>) -> Self {
        let redemption = compute_redemption(subtotal, balance, policy.as_ref());

        Self {
            subtotal,
            balance,
            policy,
            use_wallet: false,
            redemption,
            server_message: None,
        }
    }

    fn recompute(&mut self) {
        self.redemption = compute_redemption(self.subtotal, self.balance, self.policy.as_ref());
        self.server_message = None;
    }

    /// Update the cart subtotal; recomputes the redemption
    pub fn set_subtotal(&mut self, subtotal: Decimal) {
        self.subtotal = subtotal;
        self.recompute();
    }

    /// Update the wallet balance; recomputes the redemption
    pub fn set_balance(&mut self, balance: Coins) {
        self.balance = balance;
        self.recompute();
    }

    /// Update the wallet policy; recomputes the redemption
    pub fn set_policy(&mut self, policy: Option<WalletPolicy>) {
        self.policy = policy;
        self.recompute();
    }

    /// Toggle whether the computed redemption is applied to the total
    pub fn set_use_wallet(&mut self, use_wallet: bool) {
        self.use_wallet = use_wallet;
    }

    /// The redemption both preview and submission read
    pub fn redemption(&self) -> &RedemptionResult {
        &self.redemption
    }

    /// Server verdict message from the last rejected validation, if any
    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    /// Fold in the server's validation verdict.
    ///
    /// The server is authoritative: a rejection forces the local result to
    /// not-applicable and keeps the message for the UI. Accepted validations
    /// leave the local result untouched.
    pub fn apply_server_validation(&mut self, response: &ValidateRedemptionResponse) {
        if !response.valid {
            self.redemption.applicable = false;
            self.server_message = Some(response.message.clone());
        }
    }

    /// Amount payable after the applied redemption, never below zero
    pub fn payable_total(&self) -> Decimal {
        if self.use_wallet && self.redemption.applicable {
            (self.subtotal - self.redemption.discount).max(Decimal::ZERO)
        } else {
            self.subtotal
        }
    }

    /// The redemption to freeze into the order payload.
    ///
    /// `None` unless the wallet toggle is on and the result is applicable.
    pub fn order_redemption(&self) -> Option<&RedemptionResult> {
        (self.use_wallet && self.redemption.applicable).then_some(&self.redemption)
    }
}
