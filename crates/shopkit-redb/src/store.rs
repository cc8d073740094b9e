//! Redb KV store.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};
use shopkit_common::database::{self, validate_kv_params, KVStore};

use crate::error::Error;

// <(namespace, key), value>
const KV_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("kv_store");
const CONFIG_TABLE: TableDefinition<&str, &str> = TableDefinition::new("config");

const DATABASE_VERSION: u32 = 0;

/// Redb-backed [`KVStore`]
#[derive(Debug, Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a store at `path`.
    ///
    /// The parent directory must already exist. A file stamped with a newer
    /// schema version than this build understands is refused rather than
    /// migrated blindly.
    pub fn new(path: &Path) -> Result<Self, Error> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Parent directory does not exist: {parent:?}"),
                )));
            }
        }

        let db = Arc::new(Database::create(path)?);

        let db_version: Option<String> = {
            let read_txn = db.begin_read()?;
            match read_txn.open_table(CONFIG_TABLE) {
                Ok(table) => table.get("db_version")?.map(|v| v.value().to_string()),
                Err(_) => None,
            }
        };

        match db_version {
            Some(db_version) => {
                let current_file_version = u32::from_str(&db_version)?;
                tracing::debug!("Opened shopkit store at version {}", current_file_version);

                if current_file_version != DATABASE_VERSION {
                    return Err(Error::UnknownDatabaseVersion);
                }
            }
            None => {
                let write_txn = db.begin_write()?;
                {
                    let mut table = write_txn.open_table(CONFIG_TABLE)?;
                    table.insert("db_version", DATABASE_VERSION.to_string().as_str())?;
                    write_txn.open_table(KV_TABLE)?;
                }
                write_txn.commit()?;
            }
        }

        Ok(Self { db })
    }
}

#[async_trait]
impl KVStore for RedbStore {
    async fn kv_read(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, database::Error> {
        validate_kv_params(namespace, key)?;

        let read_txn = self.db.begin_read().map_err(Error::from)?;
        let table = read_txn.open_table(KV_TABLE).map_err(Error::from)?;

        let value = table
            .get((namespace, key))
            .map_err(Error::from)?
            .map(|v| v.value().to_vec());
        Ok(value)
    }

    async fn kv_write(&self, namespace: &str, key: &str, value: &[u8]) -> Result<(), database::Error> {
        validate_kv_params(namespace, key)?;

        let write_txn = self.db.begin_write().map_err(Error::from)?;
        {
            let mut table = write_txn.open_table(KV_TABLE).map_err(Error::from)?;
            table.insert((namespace, key), value).map_err(Error::from)?;
        }
        write_txn.commit().map_err(Error::from)?;

        Ok(())
    }

    async fn kv_remove(&self, namespace: &str, key: &str) -> Result<(), database::Error> {
        validate_kv_params(namespace, key)?;

        let write_txn = self.db.begin_write().map_err(Error::from)?;
        {
            let mut table = write_txn.open_table(KV_TABLE).map_err(Error::from)?;
            table.remove((namespace, key)).map_err(Error::from)?;
        }
        write_txn.commit().map_err(Error::from)?;

        Ok(())
    }

    async fn kv_list(&self, namespace: &str) -> Result<Vec<String>, database::Error> {
        let read_txn = self.db.begin_read().map_err(Error::from)?;
        let table = read_txn.open_table(KV_TABLE).map_err(Error::from)?;

        let mut keys = Vec::new();
        for result in table.range((namespace, "")..).map_err(Error::from)? {
            let (key_tuple, _) = result.map_err(Error::from)?;
            let (namespace_from_db, key) = key_tuple.value();
            if namespace_from_db != namespace {
                break;
            }
            keys.push(key.to_string());
        }

        // Keys are already sorted by the B-tree structure
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_read_remove() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RedbStore::new(&dir.path().join("kv.redb")).expect("open");

        store
            .kv_write("guest", "cart", b"[1,2]")
            .await
            .expect("write");
        assert_eq!(
            store.kv_read("guest", "cart").await.expect("read"),
            Some(b"[1,2]".to_vec())
        );

        store.kv_remove("guest", "cart").await.expect("remove");
        assert_eq!(store.kv_read("guest", "cart").await.expect("read"), None);
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("kv.redb");

        {
            let store = RedbStore::new(&path).expect("open");
            store
                .kv_write("guest", "wishlist", b"[7]")
                .await
                .expect("write");
        }

        let store = RedbStore::new(&path).expect("reopen");
        assert_eq!(
            store.kv_read("guest", "wishlist").await.expect("read"),
            Some(b"[7]".to_vec())
        );
    }

    #[tokio::test]
    async fn list_is_scoped_to_namespace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RedbStore::new(&dir.path().join("kv.redb")).expect("open");

        store.kv_write("guest", "cart", b"a").await.expect("write");
        store
            .kv_write("guest", "wishlist", b"b")
            .await
            .expect("write");
        store.kv_write("session", "token", b"c").await.expect("write");

        assert_eq!(
            store.kv_list("guest").await.expect("list"),
            vec!["cart".to_string(), "wishlist".to_string()]
        );
    }

    #[tokio::test]
    async fn missing_parent_directory_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("kv.redb");

        assert!(RedbStore::new(&path).is_err());
    }
}
