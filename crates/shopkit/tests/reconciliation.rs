//! Login reconciliation and wallet flows against a scripted connector.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use shopkit::{AuthSession, CheckoutSession, Error, Storefront, StorefrontConnector};
use shopkit_common::database::MemoryKVStore;
use shopkit_common::{
    AddCartRequest, AddWishlistRequest, CartItem, Coins, ProductSnapshot, RecordId, RedeemRequest,
    UpdateCartRequest, ValidateRedemptionRequest, ValidateRedemptionResponse, WalletBalance,
    WalletPolicy, WishlistItem,
};

#[derive(Debug, Default)]
struct FakeInner {
    cart: Mutex<Vec<CartItem>>,
    wishlist: Mutex<Vec<WishlistItem>>,
    /// Product ids whose create calls fail
    fail_creates: HashSet<u64>,
    /// Record ids whose update calls fail
    fail_updates: HashSet<u64>,
    fail_get_cart: bool,
    fail_redeem: bool,
    validate_response: Option<ValidateRedemptionResponse>,
    posted_cart: Mutex<Vec<AddCartRequest>>,
    put_cart: Mutex<Vec<(u64, UpdateCartRequest)>>,
    posted_wishlist: Mutex<Vec<AddWishlistRequest>>,
    redeems: Mutex<Vec<RedeemRequest>>,
    next_id: Mutex<u64>,
}

#[derive(Debug, Clone, Default)]
struct FakeConnector {
    inner: Arc<FakeInner>,
}

impl FakeConnector {
    fn new(inner: FakeInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    fn assign_id(&self) -> u64 {
        let mut next = self.inner.next_id.lock().expect("lock");
        *next += 1;
        *next
    }

    fn unavailable() -> Error {
        Error::HttpError(Some(503), "service unavailable".to_string())
    }
}

#[async_trait]
impl StorefrontConnector for FakeConnector {
    async fn get_cart(&self) -> Result<Vec<CartItem>, Error> {
        if self.inner.fail_get_cart {
            return Err(Self::unavailable());
        }
        Ok(self.inner.cart.lock().expect("lock").clone())
    }

    async fn post_cart_item(&self, request: AddCartRequest) -> Result<CartItem, Error> {
        if self.inner.fail_creates.contains(&request.product_id) {
            return Err(Self::unavailable());
        }

        self.inner
            .posted_cart
            .lock()
            .expect("lock")
            .push(request.clone());
        Ok(CartItem {
            id: RecordId::Persisted(self.assign_id()),
            user_id: 3,
            product: snapshot(request.product_id),
            quantity: request.quantity,
        })
    }

    async fn put_cart_item(&self, id: u64, request: UpdateCartRequest) -> Result<CartItem, Error> {
        if self.inner.fail_updates.contains(&id) {
            return Err(Self::unavailable());
        }

        self.inner
            .put_cart
            .lock()
            .expect("lock")
            .push((id, request.clone()));
        Ok(CartItem {
            id: RecordId::Persisted(id),
            user_id: 3,
            product: snapshot(0),
            quantity: request.quantity,
        })
    }

    async fn get_wishlist(&self) -> Result<Vec<WishlistItem>, Error> {
        Ok(self.inner.wishlist.lock().expect("lock").clone())
    }

    async fn post_wishlist_item(&self, request: AddWishlistRequest) -> Result<WishlistItem, Error> {
        if self.inner.fail_creates.contains(&request.product_id) {
            return Err(Self::unavailable());
        }

        self.inner
            .posted_wishlist
            .lock()
            .expect("lock")
            .push(request.clone());
        Ok(WishlistItem {
            id: RecordId::Persisted(self.assign_id()),
            user_id: 3,
            product_id: request.product_id,
            product: snapshot(request.product_id),
            date_added: chrono::Utc::now(),
        })
    }

    async fn get_wallet_balance(&self) -> Result<WalletBalance, Error> {
        Ok(WalletBalance {
            balance: Coins::from(1000),
        })
    }

    async fn get_wallet_policy(&self) -> Result<WalletPolicy, Error> {
        Ok(policy())
    }

    async fn post_validate_redemption(
        &self,
        request: ValidateRedemptionRequest,
    ) -> Result<ValidateRedemptionResponse, Error> {
        Ok(self
            .inner
            .validate_response
            .clone()
            .unwrap_or(ValidateRedemptionResponse {
                valid: true,
                coins_applicable: request.coins_to_use,
                discount: Decimal::ZERO,
                message: String::new(),
            }))
    }

    async fn post_redeem(&self, request: RedeemRequest) -> Result<(), Error> {
        self.inner.redeems.lock().expect("lock").push(request);
        if self.inner.fail_redeem {
            return Err(Self::unavailable());
        }
        Ok(())
    }
}

fn snapshot(id: u64) -> ProductSnapshot {
    ProductSnapshot::new(id, "mug", Decimal::new(24900, 2), Decimal::new(29900, 2))
}

fn policy() -> WalletPolicy {
    WalletPolicy {
        min_cart_value: Decimal::from(200),
        coin_to_currency_ratio: Decimal::new(5, 1),
        max_redeemable_coins: Coins::from(300),
        max_usage_percentage: Decimal::from(20),
    }
}

fn server_cart_item(id: u64, product_id: u64, quantity: u32) -> CartItem {
    CartItem {
        id: RecordId::Persisted(id),
        user_id: 3,
        product: snapshot(product_id),
        quantity,
    }
}

fn session() -> AuthSession {
    AuthSession {
        user_id: 3,
        email: None,
    }
}

fn storefront(connector: FakeConnector) -> Storefront {
    let mut storefront = Storefront::new(
        "https://shop.example.com/api",
        Arc::new(MemoryKVStore::new()),
    )
    .expect("valid url");
    storefront.set_client(connector);
    storefront
}

#[tokio::test]
async fn login_merges_guest_data_and_pushes() -> anyhow::Result<()> {
    let connector = FakeConnector::new(FakeInner {
        cart: Mutex::new(vec![
            server_cart_item(11, 5, 1),
            server_cart_item(12, 6, 2),
        ]),
        wishlist: Mutex::new(vec![WishlistItem {
            id: RecordId::Persisted(4),
            user_id: 3,
            product_id: 7,
            product: snapshot(7),
            date_added: chrono::Utc::now(),
        }]),
        ..FakeInner::default()
    });
    let storefront = storefront(connector.clone());

    // Guest browsing before login.
    storefront.guest.add_cart_item(snapshot(5), 3).await; // server has qty 1
    storefront.guest.add_cart_item(snapshot(6), 2).await; // same as server
    storefront.guest.add_cart_item(snapshot(9), 2).await; // unknown to server
    storefront.guest.add_wishlist_item(snapshot(7)).await; // already wishlisted
    storefront.guest.add_wishlist_item(snapshot(8)).await; // new

    let outcome = storefront.handle_login(session()).await?;

    assert_eq!(outcome.cart_created, 1);
    assert_eq!(outcome.cart_updated, 1);
    assert_eq!(outcome.wishlist_created, 1);
    assert_eq!(outcome.failed, 0);

    // Product 9 was created, product 5 raised to the guest quantity, and the
    // equal-quantity product 6 left alone.
    let posted = connector.inner.posted_cart.lock().expect("lock");
    assert_eq!(
        posted.as_slice(),
        [AddCartRequest {
            product_id: 9,
            quantity: 2,
        }]
    );
    let puts = connector.inner.put_cart.lock().expect("lock");
    assert_eq!(puts.as_slice(), [(11, UpdateCartRequest { quantity: 3 })]);
    let wishlist_posted = connector.inner.posted_wishlist.lock().expect("lock");
    assert_eq!(
        wishlist_posted.as_slice(),
        [AddWishlistRequest { product_id: 8 }]
    );

    // Guest collections are cleared by the merge.
    assert!(storefront.guest.cart_items().await.is_empty());
    assert!(storefront.guest.wishlist_items().await.is_empty());

    // Badge reflects the merged cart; the session is live.
    assert_eq!(storefront.state.cart_count(), 3);
    assert!(storefront.state.is_authenticated());

    Ok(())
}

#[tokio::test]
async fn push_failure_does_not_block_others() -> anyhow::Result<()> {
    let connector = FakeConnector::new(FakeInner {
        cart: Mutex::new(vec![server_cart_item(11, 5, 1)]),
        fail_creates: HashSet::from([9]),
        fail_updates: HashSet::from([11]),
        ..FakeInner::default()
    });
    let storefront = storefront(connector.clone());

    storefront.guest.add_cart_item(snapshot(5), 3).await; // update will fail
    storefront.guest.add_cart_item(snapshot(9), 2).await; // create will fail
    storefront.guest.add_cart_item(snapshot(13), 1).await; // create succeeds

    let outcome = storefront.handle_login(session()).await?;

    assert_eq!(outcome.cart_created, 1);
    assert_eq!(outcome.cart_updated, 0);
    assert_eq!(outcome.failed, 2);

    let posted = connector.inner.posted_cart.lock().expect("lock");
    assert_eq!(
        posted.as_slice(),
        [AddCartRequest {
            product_id: 13,
            quantity: 1,
        }]
    );

    // The guest cart stays cleared even though pushes were dropped.
    assert!(storefront.guest.cart_items().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn reconcile_without_guest_data_pushes_nothing() -> anyhow::Result<()> {
    let connector = FakeConnector::new(FakeInner {
        cart: Mutex::new(vec![server_cart_item(11, 5, 2)]),
        ..FakeInner::default()
    });
    let storefront = storefront(connector.clone());

    let outcome = storefront.handle_login(session()).await?;

    assert_eq!(outcome, shopkit::ReconcileOutcome::default());
    assert!(connector.inner.posted_cart.lock().expect("lock").is_empty());
    assert!(connector.inner.put_cart.lock().expect("lock").is_empty());

    Ok(())
}

#[tokio::test]
async fn fetch_failure_aborts_before_clearing_guest() {
    let connector = FakeConnector::new(FakeInner {
        fail_get_cart: true,
        ..FakeInner::default()
    });
    let storefront = storefront(connector);

    storefront.guest.add_cart_item(snapshot(5), 3).await;

    let result = storefront.handle_login(session()).await;
    assert!(result.is_err());

    // Nothing was merged, so the guest cart survives for the next attempt.
    assert_eq!(storefront.guest.cart_items().await.len(), 1);
}

#[tokio::test]
async fn server_rejection_forces_checkout_fallback() -> anyhow::Result<()> {
    let connector = FakeConnector::new(FakeInner {
        validate_response: Some(ValidateRedemptionResponse {
            valid: false,
            coins_applicable: Coins::ZERO,
            discount: Decimal::ZERO,
            message: "Redemption not available for these items".to_string(),
        }),
        ..FakeInner::default()
    });
    let storefront = storefront(connector);

    let balance = storefront.wallet_balance().await?;
    let policy = storefront.wallet_policy().await?;
    let mut checkout = CheckoutSession::new(Decimal::from(500), balance, Some(policy));
    checkout.set_use_wallet(true);
    assert!(checkout.order_redemption().is_some());

    let response = storefront
        .validate_redemption(ValidateRedemptionRequest {
            amount: Decimal::from(500),
            coins_to_use: checkout.redemption().coins_to_use,
            categories: Vec::new(),
        })
        .await?;
    checkout.apply_server_validation(&response);

    assert!(checkout.order_redemption().is_none());
    assert_eq!(
        checkout.server_message(),
        Some("Redemption not available for these items")
    );

    Ok(())
}

#[tokio::test]
async fn redeem_failure_never_blocks_order() -> anyhow::Result<()> {
    let connector = FakeConnector::new(FakeInner {
        fail_redeem: true,
        ..FakeInner::default()
    });
    let storefront = storefront(connector.clone());

    let mut checkout = CheckoutSession::new(Decimal::from(500), Coins::from(1000), Some(policy()));
    checkout.set_use_wallet(true);
    let redemption = checkout.order_redemption().expect("applicable").clone();

    // Swallows the 503; the order placed upstream stands.
    storefront
        .redeem_for_order("order-81", &redemption, "Coins redeemed against order")
        .await;

    let redeems = connector.inner.redeems.lock().expect("lock");
    assert_eq!(redeems.len(), 1);
    assert_eq!(redeems[0].reference_id, "order-81");
    assert_eq!(redeems[0].amount, Decimal::new(10000, 2));

    Ok(())
}

#[tokio::test]
async fn redeem_skips_inapplicable_results() -> anyhow::Result<()> {
    let connector = FakeConnector::new(FakeInner::default());
    let storefront = storefront(connector.clone());

    let checkout = CheckoutSession::new(Decimal::from(100), Coins::from(1000), Some(policy()));
    // Below the minimum cart value: nothing to book.
    assert!(checkout.order_redemption().is_none());

    storefront
        .redeem_for_order(
            "order-82",
            checkout.redemption(),
            "Coins redeemed against order",
        )
        .await;

    assert!(connector.inner.redeems.lock().expect("lock").is_empty());

    Ok(())
}
