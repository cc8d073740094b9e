//! reqwest-backed storefront connector.

use async_trait::async_trait;
use reqwest::{Client, IntoUrl};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shopkit_common::{
    AddCartRequest, AddWishlistRequest, CartItem, ErrorResponse, RedeemRequest, StoreUrl,
    UpdateCartRequest, ValidateRedemptionRequest, ValidateRedemptionResponse, WalletBalance,
    WalletPolicy, WishlistItem,
};

use super::{Error, StorefrontConnector};

#[derive(Debug, Clone)]
struct HttpClientCore {
    inner: Client,
}

fn http_error(e: reqwest::Error) -> Error {
    Error::HttpError(e.status().map(|status_code| status_code.as_u16()), e.to_string())
}

impl HttpClientCore {
    fn new() -> Result<Self, Error> {
        // Cookie jar holds the session the storefront API authenticates by.
        let inner = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(http_error)?;

        Ok(Self { inner })
    }

    fn client(&self) -> &Client {
        &self.inner
    }

    fn decode<R: DeserializeOwned>(response: &str) -> Result<R, Error> {
        serde_json::from_str::<R>(response).map_err(|err| {
            tracing::warn!("Http response error: {}", err);
            match ErrorResponse::from_json(response) {
                Ok(ok) => <ErrorResponse as Into<Error>>::into(ok),
                Err(err) => err.into(),
            }
        })
    }

    async fn http_get<U: IntoUrl + Send, R: DeserializeOwned>(&self, url: U) -> Result<R, Error> {
        let response = self
            .client()
            .get(url)
            .send()
            .await
            .map_err(http_error)?
            .text()
            .await
            .map_err(http_error)?;

        Self::decode(&response)
    }

    async fn http_post<U: IntoUrl + Send, P: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: U,
        payload: &P,
    ) -> Result<R, Error> {
        let response = self
            .client()
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(http_error)?
            .text()
            .await
            .map_err(http_error)?;

        Self::decode(&response)
    }

    async fn http_put<U: IntoUrl + Send, P: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: U,
        payload: &P,
    ) -> Result<R, Error> {
        let response = self
            .client()
            .put(url)
            .json(payload)
            .send()
            .await
            .map_err(http_error)?
            .text()
            .await
            .map_err(http_error)?;

        Self::decode(&response)
    }

    /// POST whose success carries no meaningful body; only the status and an
    /// optional error body matter.
    async fn http_post_unit<U: IntoUrl + Send, P: Serialize + ?Sized>(
        &self,
        url: U,
        payload: &P,
    ) -> Result<(), Error> {
        let response = self
            .client()
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.map_err(http_error)?;
        match ErrorResponse::from_json(&body) {
            Ok(err) => Err(Error::HttpError(
                err.code.or(Some(status.as_u16())),
                err.message,
            )),
            Err(_) => Err(Error::HttpError(Some(status.as_u16()), body)),
        }
    }
}

/// Http Client
#[derive(Debug, Clone)]
pub struct HttpClient {
    core: HttpClientCore,
    store_url: StoreUrl,
}

impl HttpClient {
    /// Create new [`HttpClient`]
    pub fn new(store_url: StoreUrl) -> Result<Self, Error> {
        Ok(Self {
            core: HttpClientCore::new()?,
            store_url,
        })
    }
}

#[async_trait]
impl StorefrontConnector for HttpClient {
    async fn get_cart(&self) -> Result<Vec<CartItem>, Error> {
        let url = self.store_url.join("cart")?;
        self.core.http_get(url).await
    }

    async fn post_cart_item(&self, request: AddCartRequest) -> Result<CartItem, Error> {
        let url = self.store_url.join("cart")?;
        self.core.http_post(url, &request).await
    }

    async fn put_cart_item(&self, id: u64, request: UpdateCartRequest) -> Result<CartItem, Error> {
        let url = self.store_url.join(&format!("cart/{id}"))?;
        self.core.http_put(url, &request).await
    }

    async fn get_wishlist(&self) -> Result<Vec<WishlistItem>, Error> {
        let url = self.store_url.join("wishlist")?;
        self.core.http_get(url).await
    }

    async fn post_wishlist_item(&self, request: AddWishlistRequest) -> Result<WishlistItem, Error> {
        let url = self.store_url.join("wishlist")?;
        self.core.http_post(url, &request).await
    }

    async fn get_wallet_balance(&self) -> Result<WalletBalance, Error> {
        let url = self.store_url.join("wallet")?;
        self.core.http_get(url).await
    }

    async fn get_wallet_policy(&self) -> Result<WalletPolicy, Error> {
        let url = self.store_url.join("wallet/settings")?;
        self.core.http_get(url).await
    }

    async fn post_validate_redemption(
        &self,
        request: ValidateRedemptionRequest,
    ) -> Result<ValidateRedemptionResponse, Error> {
        let url = self.store_url.join("wallet/validate-redemption")?;
        self.core.http_post(url, &request).await
    }

    async fn post_redeem(&self, request: RedeemRequest) -> Result<(), Error> {
        let url = self.store_url.join("wallet/redeem")?;
        self.core.http_post_unit(url, &request).await
    }
}
