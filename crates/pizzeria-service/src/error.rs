//! # Service Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Service Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐  │
//! │  │     Domain      │  │  Configuration  │  │       Runtime           │  │
//! │  │                 │  │                 │  │                         │  │
//! │  │  Core(CoreError)│  │  InvalidConfig  │  │  Serialization          │  │
//! │  │                 │  │  ConfigLoad     │  │  ShuttingDown           │  │
//! │  │                 │  │  ConfigSave     │  │                         │  │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pizzeria_core::CoreError;
use thiserror::Error;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The service no longer accepts orders.
    #[error("Order service is shutting down")]
    ShuttingDown,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ServiceError {
    fn from(err: toml::de::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ServiceError {
    fn from(err: toml::ser::Error) -> Self {
        ServiceError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ServiceError {
    /// True if the operation referenced an order or menu item that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::Core(CoreError::OrderNotFound(_))
                | ServiceError::Core(CoreError::MenuItemNotFound(_))
        )
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, ServiceError::Core(CoreError::InvalidTransition { .. }))
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidConfig(_)
                | ServiceError::ConfigLoadFailed(_)
                | ServiceError::ConfigSaveFailed(_)
        )
    }
}
