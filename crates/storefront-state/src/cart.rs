//! # Persistent Cart Store
//!
//! The cart the UI talks to: a [`Cart`] that is saved after every change.
//!
//! ## Write-Through
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item / update_quantity / remove_item / clear                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock Mutex<Cart>  ─────────────────────────────── held until return    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  next = cart.clone(); apply the operation to next                       │
//! │       │                                                                 │
//! │       ├── rule broken ──────────► Err(Core), cart untouched             │
//! │       ├── nothing changed ──────► Ok, no write                          │
//! │       ▼                                                                 │
//! │  persistence.save(next.snapshot())                                      │
//! │       │                                                                 │
//! │       ├── save failed ──────────► Err(Storage), cart untouched          │
//! │       ▼                                                                 │
//! │  *cart = next  ──────────────────► Ok(CartUpdate)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Memory and storage therefore never disagree: a reader sees either the
//! old state or the new one, and the new one is already on disk.
//!
//! ## Thread Safety
//! The store is `Send + Sync`. Share it behind an `Arc`; operations queue on
//! the mutex and never interleave.

use serde::{Deserialize, Serialize};
use storefront_core::{Cart, CartSnapshot, CartTotals, CoreResult, ItemChange, PricingRules, Product};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{StateError, StateResult};
use crate::persistence::CartPersistence;

/// Result of a store operation: what happened, and the cart afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartUpdate {
    pub change: ItemChange,
    pub snapshot: CartSnapshot,
}

/// A cart that persists itself after every change.
#[derive(Debug)]
pub struct PersistentCartStore {
    cart: Mutex<Cart>,
    persistence: CartPersistence,
}

impl PersistentCartStore {
    /// Opens the store, restoring whatever `persistence` holds.
    pub async fn open(persistence: CartPersistence) -> Self {
        Self::open_with_rules(persistence, PricingRules::STANDARD).await
    }

    /// Opens the store under custom pricing rules.
    ///
    /// Restored totals are recomputed under `rules`.
    pub async fn open_with_rules(persistence: CartPersistence, rules: PricingRules) -> Self {
        let snapshot = persistence.load().await;
        let cart = Cart::from_snapshot(snapshot, rules);

        info!(
            key = %persistence.key(),
            items = cart.item_count(),
            total_items = cart.totals().total_items,
            "Cart store opened"
        );

        PersistentCartStore {
            cart: Mutex::new(cart),
            persistence,
        }
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    ///
    /// ## Errors
    /// - `Core(InvalidQuantity)` when `quantity` ≤ 0
    /// - `Storage` when the new state could not be saved
    pub async fn add_item(&self, product: &Product, quantity: i64) -> StateResult<CartUpdate> {
        debug!(product_id = %product.id, quantity, "Adding item to cart");
        self.apply("add_item", |cart| cart.add_item(product, quantity))
            .await
    }

    /// Sets a line's quantity. `quantity` ≤ 0 removes the line.
    ///
    /// An unknown `product_id` is a no-op reported as `NotInCart`.
    pub async fn update_quantity(&self, product_id: &str, quantity: i64) -> StateResult<CartUpdate> {
        debug!(product_id = %product_id, quantity, "Updating cart quantity");
        self.apply("update_quantity", |cart| {
            cart.update_quantity(product_id, quantity)
        })
        .await
    }

    /// Removes a line. An unknown `product_id` is a no-op.
    pub async fn remove_item(&self, product_id: &str) -> StateResult<CartUpdate> {
        debug!(product_id = %product_id, "Removing item from cart");
        self.apply("remove_item", |cart| Ok(cart.remove_item(product_id)))
            .await
    }

    /// Empties the cart and saves the empty snapshot.
    pub async fn clear(&self) -> StateResult<CartSnapshot> {
        let mut cart = self.cart.lock().await;

        let mut next = cart.clone();
        next.clear();
        let snapshot = next.snapshot();

        if let Err(err) = self.persistence.save(&snapshot).await {
            warn!(error = %err, "Failed to save cleared cart");
            return Err(err);
        }

        *cart = next;
        debug!("Cart cleared");
        Ok(snapshot)
    }

    /// Empties the cart and returns what it held, in one locked step.
    ///
    /// ## Errors
    /// - `EmptyCart` when there is nothing to take
    /// - `Storage` when the empty cart could not be saved; nothing is taken
    pub async fn take(&self) -> StateResult<CartSnapshot> {
        let mut cart = self.cart.lock().await;
        if cart.is_empty() {
            return Err(StateError::EmptyCart);
        }

        let taken = cart.snapshot();
        let mut next = cart.clone();
        next.clear();

        if let Err(err) = self.persistence.save(&next.snapshot()).await {
            warn!(error = %err, "Failed to save emptied cart, items kept");
            return Err(err);
        }

        *cart = next;
        debug!(items = taken.items.len(), "Cart taken");
        Ok(taken)
    }

    /// The current items and totals.
    pub async fn snapshot(&self) -> CartSnapshot {
        self.cart.lock().await.snapshot()
    }

    pub async fn totals(&self) -> CartTotals {
        *self.cart.lock().await.totals()
    }

    /// Whether another unit of `product_id` fits within its inventory.
    pub async fn can_increment(&self, product_id: &str) -> bool {
        self.cart.lock().await.can_increment(product_id)
    }

    pub fn persistence(&self) -> &CartPersistence {
        &self.persistence
    }

    /// Runs `op` on a copy of the cart, saves, then commits.
    async fn apply<F>(&self, op: &'static str, f: F) -> StateResult<CartUpdate>
    where
        F: FnOnce(&mut Cart) -> CoreResult<ItemChange>,
    {
        let mut cart = self.cart.lock().await;

        let mut next = cart.clone();
        let change = f(&mut next)?;

        if change.is_change() {
            if let Err(err) = self.persistence.save(&next.snapshot()).await {
                warn!(op, error = %err, "Failed to save cart, change discarded");
                return Err(err);
            }
            *cart = next;
        }

        Ok(CartUpdate {
            change,
            snapshot: cart.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, SlotStorage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use storefront_core::{CoreError, Money};

    /// Memory storage whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl SlotStorage for FlakyStorage {
        async fn get_item(&self, key: &str) -> StateResult<Option<String>> {
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> StateResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StateError::storage("quota exceeded"));
            }
            self.inner.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> StateResult<()> {
            self.inner.remove_item(key).await
        }
    }

    fn product_a() -> Product {
        Product::new("A", Money::from_cents(2999), 5)
    }

    fn product_b() -> Product {
        Product::new("B", Money::from_cents(4999), 5)
    }

    async fn open(storage: &MemoryStorage) -> PersistentCartStore {
        PersistentCartStore::open(CartPersistence::new(Arc::new(storage.clone()))).await
    }

    async fn saved(storage: &MemoryStorage) -> CartSnapshot {
        CartPersistence::new(Arc::new(storage.clone())).load().await
    }

    #[tokio::test]
    async fn test_add_merges_and_persists() {
        let storage = MemoryStorage::new();
        let store = open(&storage).await;

        let first = store.add_item(&product_a(), 2).await.unwrap();
        let second = store.add_item(&product_a(), 3).await.unwrap();

        assert_eq!(first.change, ItemChange::Added);
        assert_eq!(second.change, ItemChange::Merged);
        assert_eq!(second.snapshot.items.len(), 1);
        assert_eq!(second.snapshot.items[0].quantity, 5);
        assert_eq!(saved(&storage).await, second.snapshot);
    }

    #[tokio::test]
    async fn test_reopen_restores_cart() {
        let storage = MemoryStorage::new();
        {
            let store = open(&storage).await;
            store.add_item(&product_a(), 2).await.unwrap();
            store.add_item(&product_b(), 1).await.unwrap();
        }

        let reopened = open(&storage).await;
        let totals = reopened.totals().await;

        assert_eq!(totals.subtotal.cents(), 10997);
        assert_eq!(totals.tax.cents(), 880);
        assert_eq!(totals.shipping, Money::zero());
        assert_eq!(totals.total.cents(), 11877);
        assert_eq!(totals.total_items, 3);
    }

    #[tokio::test]
    async fn test_update_to_zero_removes() {
        let storage = MemoryStorage::new();
        let store = open(&storage).await;
        store.add_item(&product_a(), 2).await.unwrap();
        store.add_item(&product_b(), 1).await.unwrap();

        let update = store.update_quantity("A", 0).await.unwrap();

        assert_eq!(update.change, ItemChange::Removed);
        assert_eq!(update.snapshot.items.len(), 1);
        assert_eq!(saved(&storage).await.items.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_noop() {
        let storage = MemoryStorage::new();
        let store = open(&storage).await;

        let update = store.update_quantity("missing", 4).await.unwrap();
        assert_eq!(update.change, ItemChange::NotInCart);

        let update = store.remove_item("missing").await.unwrap();
        assert_eq!(update.change, ItemChange::NotInCart);

        assert!(update.snapshot.is_empty());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_quantity_rejected() {
        let storage = MemoryStorage::new();
        let store = open(&storage).await;

        let err = store.add_item(&product_a(), 0).await.unwrap_err();

        assert!(matches!(
            err,
            StateError::Core(CoreError::InvalidQuantity { quantity: 0 })
        ));
        assert!(store.snapshot().await.is_empty());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let storage = MemoryStorage::new();
        let store = open(&storage).await;

        let err = store
            .add_item(&Product::new("neg", Money::from_cents(-500), 10), 2)
            .await
            .unwrap_err();

        assert!(matches!(err, StateError::Core(CoreError::InvalidPrice { .. })));
        assert!(store.snapshot().await.is_empty());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_save_failure_leaves_cart_unchanged() {
        let storage = Arc::new(FlakyStorage::default());
        let store = PersistentCartStore::open(CartPersistence::new(storage.clone())).await;
        store.add_item(&product_a(), 1).await.unwrap();
        let before = store.snapshot().await;

        storage.fail_writes.store(true, Ordering::SeqCst);

        assert!(matches!(
            store.add_item(&product_b(), 1).await,
            Err(StateError::Storage(_))
        ));
        assert!(matches!(
            store.update_quantity("A", 3).await,
            Err(StateError::Storage(_))
        ));
        assert!(matches!(store.clear().await, Err(StateError::Storage(_))));

        assert_eq!(store.snapshot().await, before);
        let persisted = CartPersistence::new(storage.clone()).load().await;
        assert_eq!(persisted, before);
    }

    #[tokio::test]
    async fn test_clear_persists_empty_snapshot() {
        let storage = MemoryStorage::new();
        let store = open(&storage).await;
        store.add_item(&product_a(), 2).await.unwrap();

        let snapshot = store.clear().await.unwrap();

        assert_eq!(snapshot, CartSnapshot::empty());
        assert_eq!(saved(&storage).await, CartSnapshot::empty());
        assert!(storage.get_item("cart-storage").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_take_empties_and_returns_contents() {
        let storage = MemoryStorage::new();
        let store = open(&storage).await;

        assert!(matches!(store.take().await, Err(StateError::EmptyCart)));

        store.add_item(&product_a(), 2).await.unwrap();
        let before = store.snapshot().await;

        let taken = store.take().await.unwrap();

        assert_eq!(taken, before);
        assert!(store.snapshot().await.is_empty());
        assert_eq!(saved(&storage).await, CartSnapshot::empty());
    }

    #[tokio::test]
    async fn test_corrupt_storage_opens_empty() {
        let storage = MemoryStorage::new();
        storage.set_item("cart-storage", "][").await.unwrap();

        let store = open(&storage).await;

        assert_eq!(store.snapshot().await, CartSnapshot::empty());
    }

    #[tokio::test]
    async fn test_concurrent_adds_do_not_interleave() {
        let storage = MemoryStorage::new();
        let store = Arc::new(open(&storage).await);

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add_item(&product_a(), 1).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.items[0].quantity, 20);
        assert_eq!(saved(&storage).await, snapshot);
    }

    #[tokio::test]
    async fn test_can_increment_respects_inventory() {
        let store = open(&MemoryStorage::new()).await;
        store.add_item(&product_a(), 4).await.unwrap();
        assert!(store.can_increment("A").await);

        store.update_quantity("A", 5).await.unwrap();
        assert!(!store.can_increment("A").await);
    }
}
