//! # Catalog Types
//!
//! Core reference types shared across the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog-facing types                               │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    Product      │   │    TaxRate      │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  id (string)    │   │  bps (u32)      │                              │
//! │  │  name           │   │  800 = 8%       │                              │
//! │  │  price (Money)  │   └─────────────────┘                              │
//! │  │  category       │                                                    │
//! │  │  inventory      │   Cart types live in `cart`,                       │
//! │  │  slug, rating…  │   order types in `order`.                          │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products are owned by the catalog. The cart keeps a copy and never
//! mutates it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// A sales tax rate in basis points: 800 is 8%, 825 is 8.25%.
///
/// Whole basis points keep [`Money::calculate_tax`] in integer math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

/// `8%`, `8.25%`.
impl std::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (whole, frac) = (self.0 / 100, self.0 % 100);
        if frac == 0 {
            write!(f, "{whole}%")
        } else if frac % 10 == 0 {
            write!(f, "{whole}.{}%", frac / 10)
        } else {
            write!(f, "{whole}.{frac:02}%")
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product listed in the catalog.
///
/// Pricing only needs `id`, `price` and `inventory`; every descriptive field
/// defaults when missing so thin catalog records still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Unit price. Negative prices are rejected on deserialize.
    #[ts(type = "number")]
    #[serde(deserialize_with = "crate::money::deserialize_non_negative")]
    pub price: Money,

    /// Image URL.
    #[serde(default)]
    pub image: String,

    /// Category key as the catalog reports it (e.g. `"men's clothing"`).
    #[serde(default)]
    pub category: String,

    /// Units available.
    pub inventory: u32,

    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub review_count: u32,

    #[serde(default)]
    pub features: Vec<String>,

    /// URL slug, see [`crate::format::create_slug`].
    #[serde(default)]
    pub slug: String,
}

impl Product {
    /// Creates a product carrying only the fields pricing depends on.
    pub fn new(id: impl Into<String>, price: Money, inventory: u32) -> Self {
        Product {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            price,
            image: String::new(),
            category: String::new(),
            inventory,
            rating: 0.0,
            review_count: 0,
            features: Vec::new(),
            slug: String::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Checks whether `quantity` units fit within the available inventory.
    pub fn can_purchase(&self, quantity: u32) -> bool {
        quantity <= self.inventory
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
