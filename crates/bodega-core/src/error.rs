//! # Error Types
//!
//! Domain-specific error types for bodega-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                │
//! │                                                                     │
//! │  bodega-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  bodega-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures, wraps CoreError for the   │
//! │                         write paths (sale engine, settlement)       │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → DbError → caller               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, sale id, amounts)
//! 3. Errors are enum variants, never String
//! 4. A failed write path surfaces exactly one error after a full rollback

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These represent business rule violations raised inside the sale engine
/// and the payment reconciliation path. Each maps to a user-facing message.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product referenced by a cart item does not exist.
    ///
    /// Raised mid-transaction; the whole sale rolls back.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Sale referenced by a payment does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Insufficient stock to commit a sale line.
    ///
    /// The conditional decrement found fewer units than requested at the
    /// commit instant. Listing filters only hide depleted products; this
    /// is the authoritative check.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// The sale already has a payment recorded against it.
    ///
    /// The data model allows at most one payment per sale.
    #[error("Sale {0} is already settled")]
    SaleAlreadySettled(String),

    /// Tendered amount does not cover the sale total.
    ///
    /// Both amounts are in foreign-currency cents, converted with the
    /// sale's frozen rate snapshot.
    #[error("Payment of {tendered_cents} cents does not cover sale total of {total_cents} cents")]
    PaymentBelowTotal {
        total_cents: i64,
        tendered_cents: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements.
/// Used for early validation before any transaction is opened.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The cart has no items; a sale must have at least one line.
    #[error("Cart is empty")]
    EmptyCart,

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., not a UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Harina PAN".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Harina PAN: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::EmptyCart;
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_payment_below_total_message() {
        let err = CoreError::PaymentBelowTotal {
            total_cents: 1000,
            tendered_cents: 750,
        };
        assert_eq!(
            err.to_string(),
            "Payment of 750 cents does not cover sale total of 1000 cents"
        );
    }
}
