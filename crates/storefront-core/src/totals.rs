//! # Totals Calculator
//!
//! Pure functions from a line-item collection to cart totals.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  items ──► subtotal = Σ price × qty                                    │
//! │                │                                                        │
//! │                ├──► tax      = subtotal × TAX_RATE (to the cent)        │
//! │                │                                                        │
//! │                └──► shipping = 0            if subtotal ≤ 0             │
//! │                                0            if subtotal ≥ threshold     │
//! │                                FLAT_COST    otherwise                   │
//! │                                                                         │
//! │  total      = subtotal + tax + shipping                                │
//! │  totalItems = Σ qty                                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every sum is integer addition over cents, so the result does not depend
//! on item order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::LineItem;
use crate::money::Money;
use crate::pricing::PricingRules;

/// The derived fields of a cart.
///
/// Missing fields deserialize as zero; they are recomputed on restore anyway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct CartTotals {
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub tax: Money,
    #[ts(type = "number")]
    pub shipping: Money,
    #[ts(type = "number")]
    pub total: Money,
    pub total_items: u32,
}

impl CartTotals {
    /// All-zero totals (the empty cart).
    pub const fn zero() -> Self {
        CartTotals {
            subtotal: Money::zero(),
            tax: Money::zero(),
            shipping: Money::zero(),
            total: Money::zero(),
            total_items: 0,
        }
    }
}

impl PricingRules {
    /// Tax owed on `subtotal`.
    pub fn tax(&self, subtotal: Money) -> Money {
        subtotal.calculate_tax(self.tax_rate)
    }

    /// Shipping owed on `subtotal`. The threshold is inclusive.
    pub fn shipping(&self, subtotal: Money) -> Money {
        if !subtotal.is_positive() || subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.flat_shipping_cost
        }
    }

    /// Computes every derived field for `items`.
    pub fn totals(&self, items: &[LineItem]) -> CartTotals {
        let subtotal = subtotal(items);
        let tax = self.tax(subtotal);
        let shipping = self.shipping(subtotal);

        CartTotals {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
            total_items: total_items(items),
        }
    }
}

/// Σ price × quantity. Zero for an empty slice.
pub fn subtotal(items: &[LineItem]) -> Money {
    items.iter().map(LineItem::line_total).sum()
}

/// Tax on `subtotal` under the standard rules.
pub fn tax(subtotal: Money) -> Money {
    PricingRules::STANDARD.tax(subtotal)
}

/// Shipping on `subtotal` under the standard rules.
pub fn shipping(subtotal: Money) -> Money {
    PricingRules::STANDARD.shipping(subtotal)
}

/// Grand total under the standard rules.
pub fn total(items: &[LineItem]) -> Money {
    calculate(items).total
}

/// Σ quantity, saturating at `u32::MAX`.
///
/// [`Cart`](crate::cart::Cart) keeps the sum below that bound; a restored
/// snapshot may not.
pub fn total_items(items: &[LineItem]) -> u32 {
    items
        .iter()
        .fold(0u32, |sum, item| sum.saturating_add(item.quantity))
}

/// All derived fields under the standard rules.
pub fn calculate(items: &[LineItem]) -> CartTotals {
    PricingRules::STANDARD.totals(items)
}

/// Rounds a decimal amount to two places.
///
/// For inputs that arrive as floats (form fields, third-party JSON) before
/// they are turned into [`Money`].
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Product, TaxRate};

    fn item(id: &str, cents: i64, quantity: u32) -> LineItem {
        LineItem::new(Product::new(id, Money::from_cents(cents), 10), quantity)
    }

    fn sample_items() -> Vec<LineItem> {
        vec![item("1", 2999, 2), item("2", 4999, 1)]
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(subtotal(&sample_items()).cents(), 10997);
        assert_eq!(subtotal(&sample_items()[..1]).cents(), 5998);
        assert_eq!(subtotal(&[]), Money::zero());
    }

    #[test]
    fn test_subtotal_zero_price() {
        assert_eq!(subtotal(&[item("1", 0, 4)]), Money::zero());
    }

    #[test]
    fn test_subtotal_is_order_independent() {
        let items = vec![item("1", 2999, 2), item("2", 4999, 1), item("3", 1, 7)];
        let mut reversed = items.clone();
        reversed.reverse();
        let mut rotated = items.clone();
        rotated.rotate_left(1);

        assert_eq!(subtotal(&items), subtotal(&reversed));
        assert_eq!(subtotal(&items), subtotal(&rotated));
        assert_eq!(total(&items), total(&reversed));
    }

    #[test]
    fn test_tax() {
        assert_eq!(tax(Money::from_cents(10000)).cents(), 800);
        assert_eq!(tax(Money::from_cents(5000)).cents(), 400);
        assert_eq!(tax(Money::from_cents(100000)).cents(), 8000);
        // 10.55 × 8% = 0.844
        assert_eq!(tax(Money::from_cents(1055)).cents(), 84);
        // 99.99 × 8% = 7.9992
        assert_eq!(tax(Money::from_cents(9999)).cents(), 800);
        assert_eq!(tax(Money::zero()), Money::zero());
    }

    #[test]
    fn test_shipping_threshold() {
        assert_eq!(shipping(Money::from_cents(10000)), Money::zero());
        assert_eq!(shipping(Money::from_cents(15000)), Money::zero());
        assert_eq!(shipping(Money::from_cents(9999)).cents(), 999);
        assert_eq!(shipping(Money::from_cents(2500)).cents(), 999);
        assert_eq!(shipping(Money::zero()), Money::zero());
    }

    #[test]
    fn test_shipping_iff_property() {
        let threshold = PricingRules::STANDARD.free_shipping_threshold.cents();
        for cents in [0, 1, 999, 9_998, 9_999, 10_000, 10_001, 25_000] {
            let free = cents == 0 || cents >= threshold;
            let expected = if free { 0 } else { 999 };
            assert_eq!(shipping(Money::from_cents(cents)).cents(), expected, "{cents}");
        }
    }

    #[test]
    fn test_cart_totals_above_threshold() {
        let totals = calculate(&sample_items());

        assert_eq!(totals.subtotal.cents(), 10997);
        assert_eq!(totals.shipping, Money::zero());
        // 8.7976 → 8.80
        assert_eq!(totals.tax.cents(), 880);
        // ≈ 118.7676
        assert_eq!(totals.total.cents(), 11877);
        assert_eq!(totals.total_items, 3);
    }

    #[test]
    fn test_cart_totals_below_threshold() {
        let totals = calculate(&[item("1", 2999, 1)]);

        assert_eq!(totals.subtotal.cents(), 2999);
        assert_eq!(totals.shipping.cents(), 999);
        // ≈ 2.3992
        assert_eq!(totals.tax.cents(), 240);
        // ≈ 42.3792
        assert_eq!(totals.total.cents(), 4238);
        assert_eq!(totals.total_items, 1);
    }

    #[test]
    fn test_cart_totals_within_a_cent_of_exact() {
        let totals = calculate(&sample_items());
        let exact_total = 109.97 + 109.97 * 0.08;
        assert!((totals.total.to_decimal_dollars() - exact_total).abs() <= 0.01);
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(calculate(&[]), CartTotals::zero());
    }

    #[test]
    fn test_custom_rules() {
        let rules = PricingRules {
            tax_rate: TaxRate::from_bps(1000),
            flat_shipping_cost: Money::from_cents(500),
            free_shipping_threshold: Money::from_cents(5000),
        };
        let totals = rules.totals(&[item("1", 2999, 1)]);

        assert_eq!(totals.tax.cents(), 300);
        assert_eq!(totals.shipping.cents(), 500);
        assert_eq!(rules.shipping(Money::from_cents(5000)), Money::zero());
    }

    #[test]
    fn test_total_items_saturates() {
        let items = vec![item("1", 1, u32::MAX), item("2", 1, 5)];
        assert_eq!(total_items(&items), u32::MAX);
    }

    #[test]
    fn test_round_to_cents() {
        assert_eq!(round_to_cents(8.7976), 8.8);
        assert_eq!(round_to_cents(42.3792), 42.38);
    }
}
