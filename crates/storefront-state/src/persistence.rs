//! # Cart Persistence
//!
//! Saves and restores the cart snapshot through a [`SlotStorage`] slot.
//!
//! ## Stored Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  written by save():                                                     │
//! │    {"items":[...],"totalItems":3,"subtotal":109.97,"tax":8.8,...}       │
//! │                                                                         │
//! │  also accepted by load() (sessions that wrapped the state):             │
//! │    {"state":{"items":[...],...},"version":0}                            │
//! │                                                                         │
//! │  missing / unreadable / malformed  ──►  empty snapshot + warn!          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use serde_json::Value;
use storefront_core::CartSnapshot;
use tracing::{debug, warn};

use crate::error::StateResult;
use crate::storage::SlotStorage;

/// Slot the cart lives in unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "cart-storage";

/// Reads and writes one cart snapshot slot.
#[derive(Clone)]
pub struct CartPersistence {
    storage: Arc<dyn SlotStorage>,
    key: String,
}

impl std::fmt::Debug for CartPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartPersistence")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CartPersistence {
    /// Persistence on the default `cart-storage` slot.
    pub fn new(storage: Arc<dyn SlotStorage>) -> Self {
        Self::with_key(storage, DEFAULT_CART_KEY)
    }

    pub fn with_key(storage: Arc<dyn SlotStorage>, key: impl Into<String>) -> Self {
        CartPersistence {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes the full snapshot, replacing the previous one.
    pub async fn save(&self, snapshot: &CartSnapshot) -> StateResult<()> {
        let json = serde_json::to_string(snapshot)?;
        self.storage.set_item(&self.key, &json).await?;

        debug!(
            key = %self.key,
            items = snapshot.items.len(),
            total_items = snapshot.totals.total_items,
            "Saved cart snapshot"
        );
        Ok(())
    }

    /// Reads the saved snapshot.
    ///
    /// Never fails: a missing slot, a storage error or unparseable JSON all
    /// yield [`CartSnapshot::empty`]. The latter two are logged.
    pub async fn load(&self) -> CartSnapshot {
        let raw = match self.storage.get_item(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No saved cart, starting empty");
                return CartSnapshot::empty();
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Could not read saved cart, starting empty");
                return CartSnapshot::empty();
            }
        };

        match parse_snapshot(&raw) {
            Ok(snapshot) => {
                debug!(key = %self.key, items = snapshot.items.len(), "Loaded cart snapshot");
                snapshot
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "Saved cart is corrupt, starting empty");
                CartSnapshot::empty()
            }
        }
    }

    /// Removes the slot.
    pub async fn clear(&self) -> StateResult<()> {
        self.storage.remove_item(&self.key).await?;
        debug!(key = %self.key, "Cleared saved cart");
        Ok(())
    }
}

/// Accepts a bare snapshot or a `{state, version}` envelope.
fn parse_snapshot(raw: &str) -> serde_json::Result<CartSnapshot> {
    let value = match serde_json::from_str::<Value>(raw)? {
        Value::Object(mut obj) => match obj.remove("state") {
            Some(state) => state,
            None => Value::Object(obj),
        },
        other => other,
    };
    serde_json::from_value(value)
}
