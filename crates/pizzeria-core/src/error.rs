//! # Error Types
//!
//! Domain-specific error types for pizzeria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pizzeria-core errors (this file)                                       │
//! │  ├── CoreError        - Order lifecycle and catalog failures            │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  pizzeria-service errors (separate crate)                               │
//! │  └── ServiceError     - Config, shutdown, wraps CoreError               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → caller/UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is a local, recoverable condition. Nothing in this
//! crate panics on bad input; the caller decides how to surface the error.

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Order lifecycle and catalog errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The order cannot be submitted.
    ///
    /// ## When This Occurs
    /// - The cart is empty at submission
    /// - The customer name is blank
    #[error("Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// No active order carries this id.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The requested status is not the immediate successor of the current one,
    /// or delivery was attempted on an order that is not ready.
    ///
    /// ## User Workflow
    /// ```text
    /// Kitchen clicks "Ready" on a confirmed order
    ///      │
    ///      ▼
    /// advance(id, Ready)   current = Confirmed, successor = Preparing
    ///      │
    ///      ▼
    /// InvalidTransition { from: Confirmed, to: Ready }
    /// ```
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Menu item cannot be found in the catalog.
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    /// A menu item with the same id already exists.
    #[error("Menu item already exists: {0}")]
    DuplicateMenuItem(String),

    /// Draft line index is out of bounds.
    #[error("No item at position {0} in the order draft")]
    CartItemNotFound(usize),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub(crate) fn invalid_order(reason: impl Into<String>) -> Self {
        CoreError::InvalidOrder {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
