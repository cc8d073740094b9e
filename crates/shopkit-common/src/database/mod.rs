//! Shopkit storage traits and utilities.
//!
//! Device-resident state is a key-value store holding JSON blobs under fixed
//! namespace/key pairs. Backends implement [`KVStore`]; the SDK never talks
//! to a concrete store directly.

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

mod memory;

pub use self::memory::MemoryKVStore;

/// Namespace holding the guest (unauthenticated) collections
pub const GUEST_NAMESPACE: &str = "guest";
/// Key under [`GUEST_NAMESPACE`] with the guest cart as one JSON array
pub const GUEST_CART_KEY: &str = "cart";
/// Key under [`GUEST_NAMESPACE`] with the guest wishlist as one JSON array
pub const GUEST_WISHLIST_KEY: &str = "wishlist";

/// Valid ASCII characters for namespace and key strings
pub const KV_NAMESPACE_KEY_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";

/// Maximum length for namespace and key strings
pub const KV_NAMESPACE_KEY_MAX_LEN: usize = 120;

/// Database Error
#[derive(Debug, Error)]
pub enum Error {
    /// Backend Error
    #[error(transparent)]
    Database(Box<dyn std::error::Error + Send + Sync>),
    /// Serde Error
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    /// Invalid namespace or key
    #[error("Invalid KV key: {0}")]
    InvalidKey(String),
    /// Internal Error
    #[error("Internal Error: {0}")]
    Internal(String),
}

fn validate_kv_string(s: &str) -> Result<(), Error> {
    if s.len() > KV_NAMESPACE_KEY_MAX_LEN {
        return Err(Error::InvalidKey(format!(
            "exceeds maximum length of {KV_NAMESPACE_KEY_MAX_LEN} characters"
        )));
    }

    if !s.chars().all(|c| KV_NAMESPACE_KEY_ALPHABET.contains(c)) {
        return Err(Error::InvalidKey(
            "only ASCII letters, numbers, underscore, and hyphen are allowed".to_string(),
        ));
    }

    Ok(())
}

/// Validates namespace and key parameters for KV store operations
pub fn validate_kv_params(namespace: &str, key: &str) -> Result<(), Error> {
    validate_kv_string(namespace)?;
    validate_kv_string(key)?;

    if key.is_empty() {
        return Err(Error::InvalidKey("key must not be empty".to_string()));
    }

    Ok(())
}

/// Key-Value Store trait
#[async_trait]
pub trait KVStore: Debug {
    /// Read value from key-value store
    async fn kv_read(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, Error>;

    /// Write value to key-value store
    async fn kv_write(&self, namespace: &str, key: &str, value: &[u8]) -> Result<(), Error>;

    /// Remove value from key-value store
    async fn kv_remove(&self, namespace: &str, key: &str) -> Result<(), Error>;

    /// List keys in a namespace
    async fn kv_list(&self, namespace: &str) -> Result<Vec<String>, Error>;
}
