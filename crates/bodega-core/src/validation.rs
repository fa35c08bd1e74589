//! # Validation Module
//!
//! Input validation for the write paths.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                             │
//! │                                                                     │
//! │  Layer 1: Frontend                                                  │
//! │  └── Immediate user feedback (empty fields, obvious typos)          │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE — before any transaction opens                │
//! │  └── Cart shape, quantities, rate snapshot, catalog input           │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  └── NOT NULL / CHECK / UNIQUE / foreign key constraints            │
//! │                                                                     │
//! │  A sale rejected here leaves zero rows behind: the transaction      │
//! │  was never opened.                                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::CartItem;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Sale Input Validators
// =============================================================================

/// Validates a cart submitted to the sale engine.
///
/// ## Rules
/// - At least one item (a committed sale always has ≥ 1 line)
/// - At most `MAX_CART_ITEMS` items
/// - Every quantity in `1..=MAX_ITEM_QUANTITY`
pub fn validate_cart(items: &[CartItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::EmptyCart);
    }

    if items.len() > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

/// Validates a single line quantity.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the rate snapshot a sale is being opened against.
///
/// The rate store legitimately serves 0.0 when empty; committing a sale
/// against that value is a caller bug, caught here.
pub fn validate_rate_snapshot(rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "rate snapshot".to_string(),
        });
    }
    Ok(())
}

/// Validates a tendered payment amount in cents.
pub fn validate_tendered_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "tendered amount".to_string(),
        });
    }
    Ok(())
}

/// Validates an entity id (UUID v4 format).
///
/// The engine treats any unknown id as `ProductNotFound`; this check is for
/// boundaries that want to reject garbage before it reaches a query.
pub fn validate_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Catalog Input Validators
// =============================================================================

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a base price in cents. Zero is allowed (giveaway items);
/// negative is not.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a catalog search term, returning it trimmed.
///
/// Empty is fine (no filter); oversized terms are rejected rather than
/// shipped into a LIKE pattern.
pub fn validate_search_term(term: &str) -> ValidationResult<String> {
    let term = term.trim();

    if term.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "search term".to_string(),
            max: 100,
        });
    }

    Ok(term.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64) -> CartItem {
        CartItem {
            product_id: "p-1".to_string(),
            quantity,
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        assert!(matches!(
            validate_cart(&[]),
            Err(ValidationError::EmptyCart)
        ));
    }

    #[test]
    fn test_nonpositive_quantity_rejected() {
        assert!(validate_cart(&[item(0)]).is_err());
        assert!(validate_cart(&[item(-3)]).is_err());
        assert!(validate_cart(&[item(1), item(0)]).is_err());
    }

    #[test]
    fn test_valid_cart_accepted() {
        assert!(validate_cart(&[item(1), item(12)]).is_ok());
    }

    #[test]
    fn test_oversized_cart_rejected() {
        let cart: Vec<CartItem> = (0..=MAX_CART_ITEMS).map(|_| item(1)).collect();
        assert!(validate_cart(&cart).is_err());
    }

    #[test]
    fn test_rate_snapshot() {
        assert!(validate_rate_snapshot(36.54).is_ok());
        assert!(validate_rate_snapshot(0.0).is_err());
        assert!(validate_rate_snapshot(-1.0).is_err());
        assert!(validate_rate_snapshot(f64::NAN).is_err());
    }

    #[test]
    fn test_product_name() {
        assert!(validate_product_name("Harina PAN 1kg").is_ok());
        assert!(validate_product_name("  ").is_err());
        assert!(validate_product_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("not-a-uuid").is_err());
    }

    #[test]
    fn test_search_term_trimmed() {
        assert_eq!(validate_search_term("  café ").unwrap(), "café");
        assert!(validate_search_term(&"x".repeat(101)).is_err());
    }
}
