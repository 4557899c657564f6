//! # Core Errors
//!
//! What the pure cart and form code can report.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart::add_item(.., 0)        ──►  CoreError::InvalidQuantity           │
//! │  Cart::add_item(-$5 product)  ──►  CoreError::InvalidPrice              │
//! │  Cart::require("missing")     ──►  CoreError::ProductNotFound           │
//! │                                                                         │
//! │  validate_zip_code("abc")     ──►  ValidationError::InvalidFormat       │
//! │  parse_checkout_form(input)   ──►  FieldErrors [ {path, message}, .. ]  │
//! │                                                                         │
//! │  storefront-state wraps all of these in StateError for the UI.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected form is data, not a failure of the program: `FieldErrors`
//! serializes straight to the UI so every bad field can be marked at once.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Cart rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Non-positive (or unrepresentable) quantity passed to an add.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 0)
    ///      │
    ///      ▼
    /// InvalidQuantity { quantity: 0 }
    ///      │
    ///      ▼
    /// UI shows: "Quantity must be at least 1"
    /// ```
    #[error("Invalid quantity {quantity}: must be a positive whole number")]
    InvalidQuantity { quantity: i64 },

    /// A product priced below zero was offered to the cart.
    #[error("Invalid price for product {product_id}: {price}")]
    InvalidPrice { product_id: String, price: Money },

    /// No line for this product id.
    ///
    /// Store operations treat an absent id as a no-op; this variant exists
    /// for callers that ask for a line that must be there.
    #[error("Product not found in cart: {0}")]
    ProductNotFound(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Why a single value failed its validator.
///
/// Form parsers turn these into [`FieldErrors`] with customer-facing
/// wording; this type carries the structured reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    /// `actual` characters, outside `min..=max`.
    #[error("{field} must be {min}-{max} characters, got {actual}")]
    Length {
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// `expected` names the accepted shape, e.g. `NNNNN or NNNNN-NNNN`.
    #[error("{field} must be {expected}")]
    InvalidFormat { field: String, expected: &'static str },

    #[error("{field} must be one of: {}", .allowed.join(", "))]
    NotAllowed {
        field: String,
        allowed: Vec<&'static str>,
    },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::Length { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// One failed rule on one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldError {
    /// Dotted camelCase path, e.g. `shippingAddress.zipCode`.
    pub path: String,
    /// User-facing message.
    pub message: String,
}

/// Every failure found while parsing a form.
///
/// Parsing never stops at the first bad field, so the UI can mark them all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{} invalid field(s): {}", .issues.len(), summary(.issues))]
pub struct FieldErrors {
    pub issues: Vec<FieldError>,
}

fn summary(issues: &[FieldError]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.path, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Messages reported for `path`.
    pub fn messages_for(&self, path: &str) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|i| i.path == path)
            .map(|i| i.message.as_str())
            .collect()
    }

    /// Every message, in report order.
    pub fn messages(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.message.as_str()).collect()
    }

    /// `Ok(value)` when nothing was reported, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
