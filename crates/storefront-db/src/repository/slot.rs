//! # Storage Slot Repository
//!
//! Named text slots: one row per key, overwritten in place.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// One row of `storage_slots`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StorageSlot {
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for the `storage_slots` table.
#[derive(Debug, Clone)]
pub struct StorageSlotRepository {
    pool: SqlitePool,
}

impl StorageSlotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StorageSlotRepository { pool }
    }

    /// The slot's value, or `None` if the key was never written or removed.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM storage_slots WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Read storage slot");
        Ok(value)
    }

    /// The full row for `key`.
    pub async fn get_entry(&self, key: &str) -> DbResult<Option<StorageSlot>> {
        let slot = sqlx::query_as::<_, StorageSlot>(
            r#"
            SELECT key, value, created_at, updated_at
            FROM storage_slots
            WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slot)
    }

    /// Like [`get_entry`](Self::get_entry), but a missing key is an error.
    pub async fn require(&self, key: &str) -> DbResult<StorageSlot> {
        self.get_entry(key)
            .await?
            .ok_or_else(|| DbError::not_found("Storage slot", key))
    }

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// `created_at` survives overwrites; `updated_at` moves.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO storage_slots (key, value, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Wrote storage slot");
        Ok(())
    }

    /// Deletes `key`. Returns whether a row existed.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM storage_slots WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        debug!(key = %key, removed, "Removed storage slot");
        Ok(removed)
    }

    /// Every key, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM storage_slots ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}
