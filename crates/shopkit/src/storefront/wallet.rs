//! Wallet operations.

use shopkit_common::{
    Coins, RedeemRequest, RedemptionResult, ReferenceType, ValidateRedemptionRequest,
    ValidateRedemptionResponse, WalletPolicy,
};
use tracing::instrument;

use super::Storefront;
use crate::error::Error;

impl Storefront {
    /// Current wallet coin balance
    #[instrument(skip(self))]
    pub async fn wallet_balance(&self) -> Result<Coins, Error> {
        Ok(self.client.get_wallet_balance().await?.balance)
    }

    /// Redemption policy as currently configured server-side.
    ///
    /// Returned as parsed; a policy that fails validation still comes back
    /// (the calculator treats it as not applicable) but is logged.
    #[instrument(skip(self))]
    pub async fn wallet_policy(&self) -> Result<WalletPolicy, Error> {
        let policy = self.client.get_wallet_policy().await?;

        if !policy.is_valid() {
            tracing::warn!("Server wallet policy fails validation; redemption will not apply");
        }

        Ok(policy)
    }

    /// Ask the server to confirm a requested redemption.
    ///
    /// The server's verdict is authoritative over the local calculator:
    /// policy data may have changed since it was fetched. A `valid: false`
    /// answer must force the checkout back to not-applicable and surface the
    /// message.
    #[instrument(skip(self, request))]
    pub async fn validate_redemption(
        &self,
        request: ValidateRedemptionRequest,
    ) -> Result<ValidateRedemptionResponse, Error> {
        self.client.post_validate_redemption(request).await
    }

    /// Book a frozen redemption against a placed order.
    ///
    /// Failure is logged and swallowed: the order stands whether or not the
    /// wallet ledger records the spend.
    #[instrument(skip(self, redemption))]
    pub async fn redeem_for_order(
        &self,
        order_id: &str,
        redemption: &RedemptionResult,
        description: &str,
    ) {
        if !redemption.applicable || redemption.coins_to_use.is_zero() {
            return;
        }

        let request = RedeemRequest {
            amount: redemption.discount,
            reference_type: ReferenceType::Order,
            reference_id: order_id.to_string(),
            description: description.to_string(),
        };

        if let Err(err) = self.client.post_redeem(request).await {
            tracing::warn!("Could not redeem coins for order {}: {}", order_id, err);
        }
    }
}
