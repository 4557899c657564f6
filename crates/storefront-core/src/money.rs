//! # Money
//!
//! Prices and totals as whole cents.
//!
//! ## Why Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Float dollars:   29.99 * 2 + 49.99  =  109.97000000000001              │
//! │                   add / remove / add  ── drifts a little each time      │
//! │                                                                         │
//! │  Integer cents:   2999 * 2 + 4999    =  10997                           │
//! │                   any sequence of edits ── exact                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The catalog and the saved cart carry decimal dollars (`29.99`). `Money`
//! reads and writes that shape and rounds to the nearest cent on the way in.
//! Every calculation in between stays in cents.
//!
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_cents(2999);
//! let line = price * 2;
//! assert_eq!(line.to_string(), "$59.98");
//! assert_eq!(serde_json::to_string(&line).unwrap(), "59.98");
//! ```

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use crate::types::TaxRate;

/// An amount of US dollars, stored as cents.
///
/// Signed so a difference can go below zero, though no cart operation
/// produces a negative amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Rounds a decimal dollar amount to the nearest cent.
    ///
    /// `None` for NaN and infinities.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal_dollars(29.99), Some(Money::from_cents(2999)));
    /// assert_eq!(Money::from_decimal_dollars(f64::NAN), None);
    /// ```
    pub fn from_decimal_dollars(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        Some(Money((amount * 100.0).round() as i64))
    }

    #[inline]
    pub fn to_decimal_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole dollars, truncated toward zero.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// The cents digits, 0..=99, without sign.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Tax on this amount, rounded half-up to the cent.
    ///
    /// `(cents * bps + 5000) / 10000`, widened to i128.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::TaxRate;
    ///
    /// // $109.97 at 8% is $8.7976
    /// let tax = Money::from_cents(10997).calculate_tax(TaxRate::from_bps(800));
    /// assert_eq!(tax.cents(), 880);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money(tax_cents as i64)
    }

    /// Line total for `qty` units. Saturates instead of wrapping.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

/// `$12.34`, or `-$5.50`. No thousands separators; see
/// [`format_currency`](crate::format::format_currency) for display text.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{sign}${}.{:02}", self.dollars().abs(), self.cents_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Serde: decimal dollars on the wire
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal_dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DollarsVisitor)
    }
}

struct DollarsVisitor;

impl<'de> Visitor<'de> for DollarsVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal dollar amount")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Money::from_decimal_dollars(v).ok_or_else(|| E::custom("amount must be finite"))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money::from_cents)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Money::from_cents)
            .ok_or_else(|| E::custom("amount out of range"))
    }
}

/// `deserialize_with` helper for amounts that must not go below zero,
/// such as unit prices.
pub fn deserialize_non_negative<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
    let amount = Money::deserialize(deserializer)?;
    if amount.is_negative() {
        return Err(de::Error::custom(format!("amount must not be negative, got {amount}")));
    }
    Ok(amount)
}
