//! In-memory KV store.
//!
//! Ephemeral backend for tests and short-lived sessions; nothing survives the
//! process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{validate_kv_params, Error, KVStore};

/// Memory-backed [`KVStore`]
#[derive(Debug, Default)]
pub struct MemoryKVStore {
    entries: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryKVStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KVStore for MemoryKVStore {
    async fn kv_read(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, Error> {
        validate_kv_params(namespace, key)?;

        let entries = self.entries.read().await;
        Ok(entries.get(&(namespace.to_string(), key.to_string())).cloned())
    }

    async fn kv_write(&self, namespace: &str, key: &str, value: &[u8]) -> Result<(), Error> {
        validate_kv_params(namespace, key)?;

        let mut entries = self.entries.write().await;
        entries.insert((namespace.to_string(), key.to_string()), value.to_vec());
        Ok(())
    }

    async fn kv_remove(&self, namespace: &str, key: &str) -> Result<(), Error> {
        validate_kv_params(namespace, key)?;

        let mut entries = self.entries.write().await;
        entries.remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }

    async fn kv_list(&self, namespace: &str) -> Result<Vec<String>, Error> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_read_remove() {
        let store = MemoryKVStore::new();

        store
            .kv_write("guest", "cart", b"[]")
            .await
            .expect("write");
        assert_eq!(
            store.kv_read("guest", "cart").await.expect("read"),
            Some(b"[]".to_vec())
        );

        store.kv_remove("guest", "cart").await.expect("remove");
        assert_eq!(store.kv_read("guest", "cart").await.expect("read"), None);
    }

    #[tokio::test]
    async fn list_is_scoped_and_sorted() {
        let store = MemoryKVStore::new();
        store.kv_write("guest", "wishlist", b"1").await.expect("write");
        store.kv_write("guest", "cart", b"2").await.expect("write");
        store.kv_write("other", "cart", b"3").await.expect("write");

        assert_eq!(
            store.kv_list("guest").await.expect("list"),
            vec!["cart".to_string(), "wishlist".to_string()]
        );
    }
}
