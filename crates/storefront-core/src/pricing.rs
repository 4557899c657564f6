//! # Pricing Rules
//!
//! The three numbers every cart total depends on.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TAX_RATE                 8%      applied to the subtotal               │
//! │  FLAT_SHIPPING_COST       $9.99   charged below the threshold           │
//! │  FREE_SHIPPING_THRESHOLD  $100    inclusive: $100.00 ships free         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Changing a value here changes calculator output and nothing else.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::TaxRate;

/// Sales tax applied to the subtotal (8%).
pub const TAX_RATE: TaxRate = TaxRate::from_bps(800);

/// Shipping charged when the subtotal is below the free-shipping threshold.
pub const FLAT_SHIPPING_COST: Money = Money::from_cents(999);

/// Subtotal at or above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(10_000);

/// A bundle of pricing constants.
///
/// `PricingRules::default()` is the canonical rule set. The calculator takes
/// rules by reference so tests can pin alternative values without touching
/// the constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRules {
    pub tax_rate: TaxRate,
    pub flat_shipping_cost: Money,
    pub free_shipping_threshold: Money,
}

impl PricingRules {
    /// The canonical rules.
    pub const STANDARD: PricingRules = PricingRules {
        tax_rate: TAX_RATE,
        flat_shipping_cost: FLAT_SHIPPING_COST,
        free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
    };
}

impl Default for PricingRules {
    fn default() -> Self {
        PricingRules::STANDARD
    }
}
