//! # Cart
//!
//! The in-memory cart: an ordered list of line items plus totals derived
//! from them.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Operations                                 │
//! │                                                                         │
//! │  Operation                    Items                    Totals           │
//! │  ─────────                    ─────                    ──────           │
//! │                                                                         │
//! │  add_item(p, n) ────────────► merge or push ─────────► recompute       │
//! │                                                                         │
//! │  update_quantity(id, n) ────► set qty (n ≤ 0: remove) ► recompute       │
//! │                                                                         │
//! │  remove_item(id) ───────────► retain != id ──────────► recompute       │
//! │                                                                         │
//! │  clear() ───────────────────► empty ─────────────────► zero            │
//! │                                                                         │
//! │  NOTE: totals are never written except by recompute.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by product id (adding the same product merges)
//! - Every quantity is > 0
//! - `totals == rules.totals(items)` after every public method returns
//!
//! Absent product ids are a benign no-op for update and remove. The
//! returned [`ItemChange`] says what happened so callers can still tell.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::PricingRules;
use crate::totals::CartTotals;
use crate::types::Product;

// =============================================================================
// Line Item
// =============================================================================

/// One product in the cart with its quantity.
///
/// The product is a frozen copy taken when it was first added; later
/// catalog price changes do not reach an existing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product: Product,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(product: Product, quantity: u32) -> Self {
        LineItem { product, quantity }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }

    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Items plus derived totals: the unit of persistence and of UI reads.
///
/// ## JSON Shape
/// ```json
/// {
///   "items": [{ "product": { "id": "1", "price": 29.99, ... }, "quantity": 2 }],
///   "totalItems": 2, "subtotal": 59.98, "tax": 4.8, "shipping": 9.99, "total": 74.77
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(flatten)]
    pub totals: CartTotals,
}

impl CartSnapshot {
    /// The empty cart: no items, every total zero.
    pub fn empty() -> Self {
        CartSnapshot::default()
    }

    /// Builds a snapshot whose totals are computed from `items`.
    pub fn from_items(items: Vec<LineItem>, rules: &PricingRules) -> Self {
        let totals = rules.totals(&items);
        CartSnapshot { items, totals }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when the stored totals match a fresh computation.
    pub fn is_consistent(&self, rules: &PricingRules) -> bool {
        self.totals == rules.totals(&self.items)
    }
}

// =============================================================================
// Item Change
// =============================================================================

/// What a cart operation did to its target line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemChange {
    /// A new line was appended.
    Added,
    /// The quantity was added to an existing line.
    Merged,
    /// The line's quantity was set.
    Updated,
    /// The line was removed.
    Removed,
    /// No line for that product id; nothing changed.
    NotInCart,
}

impl ItemChange {
    /// Whether the items changed.
    pub fn is_change(&self) -> bool {
        !matches!(self, ItemChange::NotInCart)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-memory cart store.
///
/// Holds no I/O. `storefront-state` wraps it to persist after each change.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    totals: CartTotals,
    rules: PricingRules,
}

impl Cart {
    /// Creates an empty cart under the standard pricing rules.
    pub fn new() -> Self {
        Cart::with_rules(PricingRules::STANDARD)
    }

    /// Creates an empty cart under `rules`.
    pub fn with_rules(rules: PricingRules) -> Self {
        Cart {
            items: Vec::new(),
            totals: CartTotals::zero(),
            rules,
        }
    }

    /// Restores a cart from a persisted snapshot.
    ///
    /// Stored totals are ignored and recomputed. Duplicate product ids are
    /// merged and zero quantities dropped so a hand-edited or older snapshot
    /// cannot break the invariants.
    pub fn from_snapshot(snapshot: CartSnapshot, rules: PricingRules) -> Self {
        let mut items: Vec<LineItem> = Vec::with_capacity(snapshot.items.len());
        for item in snapshot.items.into_iter().filter(|i| i.quantity > 0) {
            match items.iter_mut().find(|i| i.product.id == item.product.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity)
                }
                None => items.push(item),
            }
        }

        let mut cart = Cart {
            items,
            totals: CartTotals::zero(),
            rules,
        };
        cart.recompute();
        cart
    }

    /// Adds `quantity` units of `product`.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity becomes existing + `quantity`
    /// - Product not in cart: appended as a new line
    ///
    /// ## Errors
    /// - `InvalidQuantity` when `quantity` ≤ 0, or when the cart's total
    ///   unit count would no longer fit in a `u32`
    /// - `InvalidPrice` when the product is priced below zero
    ///
    /// The cart is untouched on error.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<ItemChange> {
        let quantity = positive_quantity(quantity)?;
        if product.price.is_negative() {
            return Err(CoreError::InvalidPrice {
                product_id: product.id.clone(),
                price: product.price,
            });
        }
        check_unit_count(self.totals.total_items, quantity)?;

        let change = match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(item) => {
                // bounded by the unit-count check above
                item.quantity += quantity;
                ItemChange::Merged
            }
            None => {
                self.items.push(LineItem::new(product.clone(), quantity));
                ItemChange::Added
            }
        };

        self.recompute();
        Ok(change)
    }

    /// Sets the quantity of a line to exactly `quantity`.
    ///
    /// A quantity ≤ 0 is the same call as [`Cart::remove_item`]; that is a
    /// deliberate merge of the two operations, not an error path. An absent
    /// product id returns `NotInCart` and leaves the cart as it was.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<ItemChange> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }
        let quantity = positive_quantity(quantity)?;

        let Some(current) = self.get(product_id).map(|item| item.quantity) else {
            return Ok(ItemChange::NotInCart);
        };
        check_unit_count(self.totals.total_items - current, quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity;
        }
        self.recompute();
        Ok(ItemChange::Updated)
    }

    /// Removes the line for `product_id` if present.
    pub fn remove_item(&mut self, product_id: &str) -> ItemChange {
        let before = self.items.len();
        self.items.retain(|i| i.product.id != product_id);

        if self.items.len() == before {
            return ItemChange::NotInCart;
        }
        self.recompute();
        ItemChange::Removed
    }

    /// Empties the cart. Always succeeds.
    pub fn clear(&mut self) {
        self.items.clear();
        self.totals = CartTotals::zero();
    }

    /// Copies out the current items and totals.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            totals: self.totals,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn totals(&self) -> &CartTotals {
        &self.totals
    }

    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// Returns the line for `product_id`.
    pub fn get(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    /// Returns the line for `product_id` or `ProductNotFound`.
    pub fn require(&self, product_id: &str) -> CoreResult<&LineItem> {
        self.get(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether one more unit of `product_id` stays within its inventory.
    ///
    /// Advisory only: the cart does not enforce inventory.
    pub fn can_increment(&self, product_id: &str) -> bool {
        self.get(product_id)
            .map(|item| item.product.can_purchase(item.quantity.saturating_add(1)))
            .unwrap_or(false)
    }

    fn recompute(&mut self) {
        self.totals = self.rules.totals(&self.items);
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

fn positive_quantity(quantity: i64) -> CoreResult<u32> {
    if quantity <= 0 {
        return Err(CoreError::InvalidQuantity { quantity });
    }
    u32::try_from(quantity).map_err(|_| CoreError::InvalidQuantity { quantity })
}

/// `others` units elsewhere in the cart plus `quantity` must fit a `u32`.
fn check_unit_count(others: u32, quantity: u32) -> CoreResult<()> {
    match others.checked_add(quantity) {
        Some(_) => Ok(()),
        None => Err(CoreError::InvalidQuantity {
            quantity: others as i64 + quantity as i64,
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price_cents: i64) -> Product {
        Product::new(id, Money::from_cents(price_cents), 10).with_name(format!("Product {id}"))
    }

    #[test]
    fn test_add_item_tracks_totals() {
        let mut cart = Cart::new();
        let change = cart.add_item(&product("prod-1", 2500), 2).unwrap();

        assert_eq!(change, ItemChange::Added);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.totals().total_items, 2);
        assert_eq!(cart.totals().subtotal.cents(), 5000);
        assert_eq!(cart.totals().shipping.cents(), 999);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let p = product("1", 999);

        cart.add_item(&p, 2).unwrap();
        let change = cart.add_item(&p, 3).unwrap();

        assert_eq!(change, ItemChange::Merged);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.totals().total_items, 5);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&product("b", 100), 1).unwrap();
        cart.add_item(&product("a", 100), 1).unwrap();
        cart.add_item(&product("b", 100), 1).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(LineItem::product_id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();

        let err = cart.add_item(&product("1", 999), 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { quantity: 0 }));

        let err = cart.add_item(&product("1", 999), -3).unwrap_err();
        assert!(matches!(err, CoreError::InvalidQuantity { quantity: -3 }));

        assert!(cart.is_empty());
        assert_eq!(*cart.totals(), CartTotals::zero());
    }

    #[test]
    fn test_add_rejects_overflowing_merge() {
        let mut cart = Cart::new();
        let p = product("1", 1);
        cart.add_item(&p, u32::MAX as i64).unwrap();

        assert!(cart.add_item(&p, 1).is_err());
        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_add_rejects_unit_count_past_u32() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 1), u32::MAX as i64).unwrap();
        let before = cart.clone();

        let err = cart.add_item(&product("b", 1), 1).unwrap_err();

        assert!(matches!(err, CoreError::InvalidQuantity { .. }));
        assert_eq!(cart, before);
        assert_eq!(cart.totals().total_items, u32::MAX);
    }

    #[test]
    fn test_update_rejects_unit_count_past_u32() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 1), (u32::MAX - 10) as i64).unwrap();
        cart.add_item(&product("b", 1), 5).unwrap();
        let before = cart.clone();

        assert!(cart.update_quantity("b", 11).is_err());
        assert_eq!(cart, before);

        assert_eq!(cart.update_quantity("b", 10).unwrap(), ItemChange::Updated);
        assert_eq!(cart.totals().total_items, u32::MAX);
    }

    #[test]
    fn test_add_rejects_negative_price() {
        let mut cart = Cart::new();
        let refund = Product::new("neg", Money::from_cents(-500), 10);

        let err = cart.add_item(&refund, 2).unwrap_err();

        assert!(matches!(err, CoreError::InvalidPrice { ref product_id, .. } if product_id == "neg"));
        assert!(cart.is_empty());
        assert_eq!(*cart.totals(), CartTotals::zero());
    }

    #[test]
    fn test_update_quantity_is_absolute() {
        let mut cart = Cart::new();
        let p = product("1", 2500);
        cart.add_item(&p, 1).unwrap();

        let change = cart.update_quantity("1", 3).unwrap();

        assert_eq!(change, ItemChange::Updated);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.totals().subtotal.cents(), 7500);
    }

    #[test]
    fn test_update_to_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 2500), 1).unwrap();
        cart.add_item(&product("2", 100), 1).unwrap();

        let change = cart.update_quantity("1", 0).unwrap();

        assert_eq!(change, ItemChange::Removed);
        assert_eq!(cart.item_count(), 1);
        assert!(cart.get("1").is_none());

        assert_eq!(cart.update_quantity("2", -1).unwrap(), ItemChange::Removed);
        assert!(cart.is_empty());
        assert_eq!(*cart.totals(), CartTotals::zero());
    }

    #[test]
    fn test_update_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 2500), 2).unwrap();
        let before = cart.clone();

        assert_eq!(cart.update_quantity("missing", 4).unwrap(), ItemChange::NotInCart);
        assert_eq!(cart.update_quantity("missing", 0).unwrap(), ItemChange::NotInCart);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 2500), 2).unwrap();

        assert_eq!(cart.remove_item("1"), ItemChange::Removed);
        assert!(cart.is_empty());
        assert_eq!(cart.totals().total_items, 0);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 2500), 2).unwrap();
        let before = cart.clone();

        assert_eq!(cart.remove_item("nope"), ItemChange::NotInCart);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_zeroes_everything() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 2999), 2).unwrap();
        cart.add_item(&product("2", 4999), 1).unwrap();

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(*cart.totals(), CartTotals::zero());
        assert_eq!(cart.snapshot(), CartSnapshot::empty());
    }

    #[test]
    fn test_totals_always_match_calculator() {
        let mut cart = Cart::new();
        let a = product("a", 2999);
        let b = product("b", 4999);

        cart.add_item(&a, 2).unwrap();
        assert!(cart.snapshot().is_consistent(cart.rules()));
        cart.add_item(&b, 1).unwrap();
        assert!(cart.snapshot().is_consistent(cart.rules()));
        cart.update_quantity("a", 1).unwrap();
        assert!(cart.snapshot().is_consistent(cart.rules()));
        cart.remove_item("b");
        assert!(cart.snapshot().is_consistent(cart.rules()));
    }

    #[test]
    fn test_repeated_add_remove_does_not_drift() {
        let mut cart = Cart::new();
        let a = product("a", 1);
        let b = product("b", 2999);
        cart.add_item(&b, 1).unwrap();

        for _ in 0..1000 {
            cart.add_item(&a, 3).unwrap();
            cart.remove_item("a");
        }

        assert_eq!(cart.totals().subtotal.cents(), 2999);
        assert_eq!(cart.totals().total.cents(), 2999 + 240 + 999);
    }

    #[test]
    fn test_from_snapshot_recomputes_and_normalizes() {
        let snapshot = CartSnapshot {
            items: vec![
                LineItem::new(product("1", 1000), 1),
                LineItem::new(product("2", 500), 0),
                LineItem::new(product("1", 1000), 2),
            ],
            totals: CartTotals {
                total: Money::from_cents(1),
                ..CartTotals::zero()
            },
        };

        let cart = Cart::from_snapshot(snapshot, PricingRules::STANDARD);

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.totals().subtotal.cents(), 3000);
        assert!(cart.snapshot().is_consistent(cart.rules()));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 2999), 1).unwrap();

        let json = serde_json::to_value(cart.snapshot()).unwrap();

        assert_eq!(json["items"][0]["quantity"], 1);
        assert_eq!(json["items"][0]["product"]["price"], 29.99);
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["subtotal"], 29.99);
        assert_eq!(json["shipping"], 9.99);
        assert_eq!(json["tax"], 2.4);
        assert_eq!(json["total"], 42.38);
    }

    #[test]
    fn test_can_increment() {
        let mut cart = Cart::new();
        let limited = Product::new("1", Money::from_cents(100), 2);
        cart.add_item(&limited, 1).unwrap();

        assert!(cart.can_increment("1"));
        cart.add_item(&limited, 1).unwrap();
        assert!(!cart.can_increment("1"));
        assert!(!cart.can_increment("absent"));
    }

    #[test]
    fn test_require_missing_product() {
        let cart = Cart::new();
        assert!(matches!(cart.require("x"), Err(CoreError::ProductNotFound(_))));
    }
}
