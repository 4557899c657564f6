//! # Validation Module
//!
//! Single-value validators and the two form parsers built on them.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Single values                                                │
//! │  ├── validate_email, validate_zip_code, validate_card_number, ...      │
//! │  └── Err(ValidationError) on the first broken rule                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Forms                                                        │
//! │  ├── parse_checkout_form, parse_contact_form                           │
//! │  ├── Every rule on every field is checked                              │
//! │  └── Err(FieldErrors) with dotted paths and user-facing messages       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: storefront-state::checkout                                   │
//! │  └── StateError::InvalidCheckout(FieldErrors)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes.
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_email, validate_zip_code};
//!
//! assert!(validate_email("customer@example.com").is_ok());
//! assert!(validate_email("a@b.c").is_err());
//! assert!(validate_zip_code("94105-1234").is_ok());
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{FieldErrors, ValidationError};
use crate::order::{PaymentMethod, PaymentType, ShippingAddress};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Checks that `value` is non-empty and within `min..=max` characters.
pub fn validate_length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.chars().count();

    if len == 0 {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if len < min || len > max {
        return Err(ValidationError::Length {
            field: field.to_string(),
            min,
            max,
            actual: len,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@`
/// - Local part: letters, digits and `_ ' + - .`; no leading dot, no `..`,
///   must end in a letter, digit, `_`, `+` or `-`
/// - Domain: dot-separated labels of letters, digits and hyphens (no leading
///   hyphen), ending in a top-level label of at least two letters
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            expected: "a valid email address",
        });
    }

    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    let local_ok = match local.chars().last() {
        Some(last) => {
            !local.starts_with('.')
                && !local.contains("..")
                && (last.is_ascii_alphanumeric() || matches!(last, '_' | '+' | '-'))
                && local
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '+' | '-' | '.'))
        }
        None => false,
    };
    if !local_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, hosts)) = labels.split_last() else {
        return false;
    };

    !hosts.is_empty()
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
        && hosts.iter().all(|label| {
            label.starts_with(|c: char| c.is_ascii_alphanumeric())
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Validates a US ZIP code: `NNNNN` or `NNNNN-NNNN`.
pub fn validate_zip_code(zip: &str) -> ValidationResult<()> {
    let ok = match zip.split_once('-') {
        Some((five, four)) => all_digits(five, 5) && all_digits(four, 4),
        None => all_digits(zip, 5),
    };

    if !ok {
        return Err(ValidationError::InvalidFormat {
            field: "zipCode".to_string(),
            expected: "NNNNN or NNNNN-NNNN",
        });
    }
    Ok(())
}

/// Validates a card number: exactly 16 digits, no separators.
pub fn validate_card_number(number: &str) -> ValidationResult<()> {
    if !all_digits(number, 16) {
        return Err(ValidationError::InvalidFormat {
            field: "cardNumber".to_string(),
            expected: "16 digits",
        });
    }
    Ok(())
}

/// Validates a card expiry in `MM/YY` form with month 01-12.
pub fn validate_expiry_date(expiry: &str) -> ValidationResult<()> {
    let ok = match expiry.split_once('/') {
        Some((mm, yy)) if all_digits(mm, 2) && all_digits(yy, 2) => {
            matches!(mm.parse::<u8>(), Ok(1..=12))
        }
        _ => false,
    };

    if !ok {
        return Err(ValidationError::InvalidFormat {
            field: "expiryDate".to_string(),
            expected: "MM/YY",
        });
    }
    Ok(())
}

/// Validates a card security code: 3 or 4 digits.
pub fn validate_cvv(cvv: &str) -> ValidationResult<()> {
    if !(all_digits(cvv, 3) || all_digits(cvv, 4)) {
        return Err(ValidationError::InvalidFormat {
            field: "cvv".to_string(),
            expected: "3 or 4 digits",
        });
    }
    Ok(())
}

/// Parses a payment type wire name.
pub fn validate_payment_type(kind: &str) -> ValidationResult<PaymentType> {
    PaymentType::parse(kind).ok_or_else(|| ValidationError::NotAllowed {
        field: "type".to_string(),
        allowed: PaymentType::ALL.iter().map(PaymentType::as_str).collect(),
    })
}

fn all_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Checkout Form
// =============================================================================

/// Raw checkout form as submitted. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutFormInput {
    pub email: String,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentInput,
}

/// Raw payment section. Card fields are optional; blank counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentInput {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
}

/// A checkout form that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub email: String,
    pub shipping_address: ShippingAddress,
    pub payment: PaymentDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub kind: PaymentType,
    pub card_number: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
}

impl PaymentDetails {
    /// Last four card digits, when a card number was given.
    pub fn last4(&self) -> Option<String> {
        self.card_number.as_deref().map(|n| {
            let digits: Vec<char> = n.chars().collect();
            digits[digits.len().saturating_sub(4)..].iter().collect()
        })
    }

    /// What an order records about this payment.
    pub fn to_payment_method(&self) -> PaymentMethod {
        PaymentMethod {
            kind: self.kind,
            last4: self.last4(),
        }
    }
}

/// Parses a checkout form, reporting every failing rule.
///
/// ## Rules
/// ```text
/// email                     5-100 chars, valid address
/// shippingAddress.fullName  2-100
/// shippingAddress.address   5-200
/// shippingAddress.city      2-100
/// shippingAddress.state     2-50
/// shippingAddress.zipCode   NNNNN | NNNNN-NNNN
/// shippingAddress.country   2-100
/// paymentMethod.type        credit_card | debit_card | paypal
/// paymentMethod.cardNumber  16 digits      (optional)
/// paymentMethod.expiryDate  MM/YY          (optional)
/// paymentMethod.cvv         3-4 digits     (optional)
/// ```
pub fn parse_checkout_form(input: CheckoutFormInput) -> Result<CheckoutForm, FieldErrors> {
    let mut errors = FieldErrors::new();

    if validate_email(&input.email).is_err() {
        errors.push("email", "Invalid email address");
    }
    check_bounds(&mut errors, "email", "Email", &input.email, 5, 100, "must not exceed");

    let addr = &input.shipping_address;
    let address_fields = [
        ("fullName", "Full name", &addr.full_name, 2, 100),
        ("address", "Address", &addr.address, 5, 200),
        ("city", "City", &addr.city, 2, 100),
        ("state", "State", &addr.state, 2, 50),
    ];
    for (key, label, value, min, max) in address_fields {
        let path = format!("shippingAddress.{key}");
        check_bounds(&mut errors, &path, label, value, min, max, "must not exceed");
    }
    if validate_zip_code(&addr.zip_code).is_err() {
        errors.push("shippingAddress.zipCode", "Invalid ZIP code format");
    }
    check_bounds(
        &mut errors,
        "shippingAddress.country",
        "Country",
        &addr.country,
        2,
        100,
        "must not exceed",
    );

    let payment = &input.payment_method;
    let kind = match validate_payment_type(&payment.kind) {
        Ok(kind) => Some(kind),
        Err(_) => {
            errors.push(
                "paymentMethod.type",
                "Payment type must be one of: credit_card, debit_card, paypal",
            );
            None
        }
    };

    let card_number = present(&payment.card_number);
    if card_number.as_deref().is_some_and(|n| validate_card_number(n).is_err()) {
        errors.push("paymentMethod.cardNumber", "Card number must be 16 digits");
    }
    let expiry_date = present(&payment.expiry_date);
    if expiry_date.as_deref().is_some_and(|e| validate_expiry_date(e).is_err()) {
        errors.push("paymentMethod.expiryDate", "Expiry date must be in MM/YY format");
    }
    let cvv = present(&payment.cvv);
    if cvv.as_deref().is_some_and(|c| validate_cvv(c).is_err()) {
        errors.push("paymentMethod.cvv", "CVV must be 3 or 4 digits");
    }

    match kind {
        Some(kind) if errors.is_empty() => Ok(CheckoutForm {
            email: input.email,
            shipping_address: input.shipping_address,
            payment: PaymentDetails {
                kind,
                card_number,
                expiry_date,
                cvv,
            },
        }),
        _ => Err(errors),
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Pushes "`label` must be at least N characters" and
/// "`label` `over` N characters" as they apply.
fn check_bounds(
    errors: &mut FieldErrors,
    path: &str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
    over: &str,
) {
    let len = value.chars().count();
    if len < min {
        errors.push(path, format!("{label} must be at least {min} characters"));
    }
    if len > max {
        errors.push(path, format!("{label} {over} {max} characters"));
    }
}

// =============================================================================
// Contact Form
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct ContactFormInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A contact message with trimmed fields and a lower-cased email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Parses a contact form.
///
/// Length and email rules see the values as typed; the accepted form is
/// trimmed afterwards and its email lower-cased.
pub fn parse_contact_form(input: ContactFormInput) -> Result<ContactForm, FieldErrors> {
    let mut errors = FieldErrors::new();

    let text_fields = [
        ("name", "Name", &input.name, 2, 100),
        ("subject", "Subject", &input.subject, 3, 200),
        ("message", "Message", &input.message, 10, 2000),
    ];
    for (path, label, value, min, max) in text_fields {
        if value.is_empty() {
            errors.push(path, format!("{label} is required"));
        }
        check_bounds(&mut errors, path, label, value, min, max, "must be less than");
    }

    if input.email.is_empty() {
        errors.push("email", "Email is required");
    }
    if validate_email(&input.email).is_err() {
        errors.push("email", "Please enter a valid email address");
    }

    errors.into_result(ContactForm {
        name: input.name.trim().to_string(),
        email: input.email.to_lowercase().trim().to_string(),
        subject: input.subject.trim().to_string(),
        message: input.message.trim().to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
