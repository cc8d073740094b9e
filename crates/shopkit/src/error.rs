//! Errors

use shopkit_common::ErrorResponse;
use thiserror::Error;

/// Shopkit SDK Error
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP error from the storefront API
    #[error("HTTP error: {1}")]
    HttpError(Option<u16>, String),
    /// The server rejected a requested redemption
    #[error("Redemption rejected: {0}")]
    RedemptionRejected(String),
    /// The wallet policy is missing or unusable
    #[error("Wallet policy invalid")]
    InvalidWalletPolicy,
    /// Url Error
    #[error(transparent)]
    Url(#[from] shopkit_common::store_url::Error),
    /// Coin amount error
    #[error(transparent)]
    Coins(#[from] shopkit_common::coins::Error),
    /// Database Error
    #[error(transparent)]
    Database(#[from] shopkit_common::database::Error),
    /// Serde Json error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    /// Custom Error message
    #[error("`{0}`")]
    Custom(String),
}

impl From<ErrorResponse> for Error {
    fn from(err: ErrorResponse) -> Error {
        Error::HttpError(err.code, err.message)
    }
}
