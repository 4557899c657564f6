//! # Slot Storage
//!
//! A named-slot key/value store holding serialized client state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SlotStorage (trait)                               │
//! │          get_item(key) / set_item(key, value) / remove_item(key)        │
//! │                                                                         │
//! │     ┌──────────────────────────┐      ┌──────────────────────────────┐  │
//! │     │ MemoryStorage            │      │ SqliteStorage                │  │
//! │     │ HashMap behind RwLock    │      │ storefront-db storage_slots  │  │
//! │     │ gone when process exits  │      │ survives restarts            │  │
//! │     └──────────────────────────┘      └──────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use storefront_db::{Database, DbConfig};
use tokio::sync::RwLock;

use crate::error::StateResult;

/// Interface for slot persistence.
#[async_trait]
pub trait SlotStorage: Send + Sync {
    /// The slot's value, or `None` if it was never written.
    async fn get_item(&self, key: &str) -> StateResult<Option<String>>;

    /// Stores `value`, replacing whatever the slot held.
    async fn set_item(&self, key: &str, value: &str) -> StateResult<()>;

    /// Deletes the slot. Removing a missing slot is not an error.
    async fn remove_item(&self, key: &str) -> StateResult<()>;
}

// =============================================================================
// Memory
// =============================================================================

/// Process-local storage. Clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[async_trait]
impl SlotStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> StateResult<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> StateResult<()> {
        self.slots
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> StateResult<()> {
        self.slots.write().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// SQLite
// =============================================================================

/// Durable storage on the `storage_slots` table.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    pub fn new(db: Database) -> Self {
        SqliteStorage { db }
    }

    /// Opens (and migrates) the database described by `config`.
    pub async fn open(config: DbConfig) -> StateResult<Self> {
        let db = Database::new(config).await?;
        Ok(SqliteStorage { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl SlotStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> StateResult<Option<String>> {
        Ok(self.db.slots().get(key).await?)
    }

    async fn set_item(&self, key: &str, value: &str) -> StateResult<()> {
        Ok(self.db.slots().set(key, value).await?)
    }

    async fn remove_item(&self, key: &str) -> StateResult<()> {
        self.db.slots().remove(key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn exercise(storage: &dyn SlotStorage) {
        assert_eq!(storage.get_item("cart-storage").await.unwrap(), None);

        storage.set_item("cart-storage", "one").await.unwrap();
        storage.set_item("cart-storage", "two").await.unwrap();
        assert_eq!(
            storage.get_item("cart-storage").await.unwrap().as_deref(),
            Some("two")
        );

        storage.remove_item("cart-storage").await.unwrap();
        storage.remove_item("cart-storage").await.unwrap();
        assert_eq!(storage.get_item("cart-storage").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_storage() {
        exercise(&MemoryStorage::new()).await;
    }

    #[tokio::test]
    async fn test_sqlite_storage() {
        let storage = SqliteStorage::open(DbConfig::in_memory()).await.unwrap();
        exercise(&storage).await;
    }

    #[tokio::test]
    async fn test_memory_clones_share_slots() {
        let a = MemoryStorage::new();
        let b = a.clone();

        a.set_item("k", "v").await.unwrap();

        assert_eq!(b.get_item("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(b.len().await, 1);
    }

    #[tokio::test]
    async fn test_sqlite_storage_survives_reopen() {
        let path = std::env::temp_dir().join(format!("storefront-{}.db", uuid::Uuid::new_v4()));

        let storage = SqliteStorage::open(DbConfig::new(&path)).await.unwrap();
        storage.set_item("cart-storage", "saved").await.unwrap();
        storage.database().close().await;

        let reopened = SqliteStorage::open(DbConfig::new(&path)).await.unwrap();
        assert_eq!(
            reopened.get_item("cart-storage").await.unwrap().as_deref(),
            Some("saved")
        );
        reopened.database().close().await;

        let _ = std::fs::remove_file(&path);
    }
}
