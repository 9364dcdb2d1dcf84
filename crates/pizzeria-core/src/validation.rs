//! # Validation Module
//!
//! Input checks applied before business rules run.
//!
//! ## Usage
//! ```rust
//! use pizzeria_core::validation::{validate_customer_name, validate_quantity};
//!
//! assert!(validate_customer_name("Maria").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_CUSTOMER_NAME_LEN: usize = 100;
const MAX_NOTE_LEN: usize = 200;
const MAX_MENU_NAME_LEN: usize = 120;

// =============================================================================
// String Validators
// =============================================================================

/// Validates the customer name on an order.
///
/// ## Rules
/// - Must not be blank
/// - At most 100 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a free-text kitchen note. Empty notes are allowed.
pub fn validate_note(note: &str) -> ValidationResult<()> {
    if note.chars().count() > MAX_NOTE_LEN {
        return Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: MAX_NOTE_LEN,
        });
    }

    Ok(())
}

/// Validates a menu item id or name.
pub fn validate_menu_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_MENU_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_MENU_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed: pizza flavors carry no
/// price of their own, the size does.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}
