//! # storefront-core: Pure Cart & Pricing Logic
//!
//! Everything the storefront computes, with no I/O: money, products, the
//! totals calculator, the in-memory cart, form parsing and catalog helpers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                        Web UI (TypeScript)                      │   │
//! │  │   Product list ──► Cart drawer ──► Checkout ──► Order success   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ts-rs bindings                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   storefront-state                              │   │
//! │  │   PersistentCartStore, place_order, config, tracing             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐  │   │
//! │  │   │ pricing │ │ totals  │ │  cart   │ │validation│ │ catalog │  │   │
//! │  │   │  rules  │ │  calc   │ │  Cart   │ │  forms   │ │ filters │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  storefront-db sits beside state: SQLite slots for the saved cart       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent `Money`
//! - [`types`] - `Product`, `TaxRate`
//! - [`pricing`] - Tax rate, flat shipping, free-shipping threshold
//! - [`totals`] - Subtotal / tax / shipping / total / item count
//! - [`cart`] - In-memory cart and its snapshot
//! - [`order`] - Orders produced by checkout
//! - [`validation`] - Single-value validators, checkout and contact forms
//! - [`catalog`] - Listing filters and sorting
//! - [`format`] - Slugs, truncation, currency and date text
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Cart, Money, Product};
//!
//! let backpack = Product::new("1", Money::from_cents(2999), 10);
//!
//! let mut cart = Cart::new();
//! cart.add_item(&backpack, 2).unwrap();
//! cart.add_item(&backpack, 1).unwrap();
//!
//! let totals = cart.totals();
//! assert_eq!(totals.total_items, 3);
//! assert_eq!(totals.subtotal.cents(), 8997);
//! assert_eq!(totals.shipping.cents(), 999); // below $100
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod format;
pub mod money;
pub mod order;
pub mod pricing;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartSnapshot, ItemChange, LineItem};
pub use error::{CoreError, CoreResult, FieldError, FieldErrors, ValidationError};
pub use money::Money;
pub use order::{Order, OrderStatus, PaymentMethod, PaymentType, ShippingAddress};
pub use pricing::PricingRules;
pub use totals::CartTotals;
pub use types::*;
pub use validation::{CheckoutForm, CheckoutFormInput, ContactForm, ContactFormInput};
