//! # State Error Types
//!
//! What store, checkout and config operations return.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CoreError (cart rules) ─────────────┐                                  │
//! │  DbError / storage backend ──────────┤                                  │
//! │  serde_json / toml / io ─────────────┼──► StateError ──► ApiError ──► UI│
//! │  FieldErrors (checkout form) ────────┘         │                        │
//! │                                                └─ code() for matching   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The frontend receives an [`ApiError`]:
//! ```json
//! { "code": "VALIDATION_ERROR", "message": "...", "fieldErrors": [...] }
//! ```

use serde::Serialize;
use storefront_core::{CoreError, FieldError, FieldErrors};
use storefront_db::DbError;
use thiserror::Error;
use ts_rs::TS;

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    /// A cart rule was broken (e.g. non-positive quantity).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The storage backend failed to read or write.
    ///
    /// Mutations that hit this leave the in-memory cart untouched.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed or written.
    #[error("Config file error: {0}")]
    Toml(String),

    #[error("Cannot check out an empty cart")]
    EmptyCart,

    #[error("Checkout form is invalid: {0}")]
    InvalidCheckout(FieldErrors),
}

impl StateError {
    pub fn storage(message: impl Into<String>) -> Self {
        StateError::Storage(message.into())
    }

    /// Machine-readable category.
    pub fn code(&self) -> ErrorCode {
        match self {
            StateError::Core(CoreError::ProductNotFound(_)) => ErrorCode::NotFound,
            StateError::Core(_) => ErrorCode::CartError,
            StateError::Storage(_) => ErrorCode::StorageError,
            StateError::Serialization(_) | StateError::Io(_) => ErrorCode::Internal,
            StateError::Config(_) | StateError::Toml(_) => ErrorCode::ConfigError,
            StateError::EmptyCart => ErrorCode::CartError,
            StateError::InvalidCheckout(_) => ErrorCode::ValidationError,
        }
    }
}

impl From<DbError> for StateError {
    fn from(err: DbError) -> Self {
        StateError::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for StateError {
    fn from(err: toml::de::Error) -> Self {
        StateError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for StateError {
    fn from(err: toml::ser::Error) -> Self {
        StateError::Toml(err.to_string())
    }
}

impl From<FieldErrors> for StateError {
    fn from(errors: FieldErrors) -> Self {
        StateError::InvalidCheckout(errors)
    }
}

// =============================================================================
// UI Payload
// =============================================================================

/// Error codes for UI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    CartError,
    StorageError,
    ConfigError,
    Internal,
}

/// Serializable error for the UI layer.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    /// Per-field messages when a form was rejected.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

impl From<StateError> for ApiError {
    fn from(err: StateError) -> Self {
        let code = err.code();
        match err {
            StateError::InvalidCheckout(errors) => ApiError {
                code,
                message: "Please correct the highlighted fields".to_string(),
                field_errors: errors.issues,
            },
            StateError::Storage(detail) => {
                tracing::error!(error = %detail, "Storage operation failed");
                ApiError {
                    code,
                    message: "Your cart could not be saved. Please try again.".to_string(),
                    field_errors: Vec::new(),
                }
            }
            other => ApiError {
                code,
                message: other.to_string(),
                field_errors: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            StateError::from(CoreError::InvalidQuantity { quantity: 0 }).code(),
            ErrorCode::CartError
        );
        assert_eq!(StateError::storage("disk full").code(), ErrorCode::StorageError);
        assert_eq!(StateError::EmptyCart.code(), ErrorCode::CartError);
        assert_eq!(
            StateError::from(DbError::PoolExhausted).code(),
            ErrorCode::StorageError
        );
    }

    #[test]
    fn test_api_error_carries_field_errors() {
        let mut errors = FieldErrors::new();
        errors.push("shippingAddress.zipCode", "Invalid ZIP code format");

        let api = ApiError::from(StateError::InvalidCheckout(errors));
        let json = serde_json::to_value(&api).unwrap();

        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["fieldErrors"][0]["path"], "shippingAddress.zipCode");
    }

    #[test]
    fn test_api_error_hides_storage_detail() {
        let api = ApiError::from(StateError::storage("SQLITE_FULL at page 42"));

        assert_eq!(api.code, ErrorCode::StorageError);
        assert!(!api.message.contains("SQLITE"));
        assert!(api.field_errors.is_empty());
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err = StateError::from(CoreError::InvalidQuantity { quantity: -1 });
        assert_eq!(
            err.to_string(),
            "Invalid quantity -1: must be a positive whole number"
        );
    }
}
