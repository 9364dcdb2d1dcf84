//! # pizzeria-core: Order Lifecycle & Pricing Engine
//!
//! Pure business logic for a pizzeria counter and kitchen: the menu, pizza
//! pricing, order drafts, the order book with its status machine, the
//! kitchen queue and the sales analytics.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Pizzeria Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    pizzeria-cli (clap)                          │    │
//! │  │        menu ──► sizes ──► shift (simulated service)             │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    pizzeria-service (tokio)                     │    │
//! │  │    OrderService, ConfirmScheduler, MenuState, PizzeriaConfig    │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ pizzeria-core (THIS CRATE) ★                    │    │
//! │  │                                                                 │    │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐   │    │
//! │  │   │ catalog │ │ pricing │ │  cart   │ │  store  │ │analytics│   │    │
//! │  │   │MenuItem │ │ Builder │ │  Draft  │ │OrderBook│ │ Report  │   │    │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘   │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO TIMERS • DETERMINISTIC                            │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Menu items, premium detection, catalog edits
//! - [`pricing`] - Pizza sizes, price rules, the pizza builder
//! - [`cart`] - The order draft being assembled at the counter
//! - [`store`] - The order book: active orders, archive, status machine
//! - [`queue`] - Kitchen queue positions
//! - [`analytics`] - Period filters and sales aggregation
//! - [`types`] - Orders, lines, statuses
//! - [`money`] - Integer money
//! - [`error`] / [`validation`] - Typed errors and input checks
//!
//! ## Example Usage
//!
//! ```rust
//! use pizzeria_core::catalog::Catalog;
//! use pizzeria_core::pricing::{price_pizza, PizzaSize};
//!
//! let catalog = Catalog::house_menu();
//! let size = PizzaSize::new("G", 4500, Some(5000));
//! let flavors = vec!["pizza-carne-sol".to_string(), "pizza-calabresa".to_string()];
//!
//! // Premium flavor mixed with another: premium price + 5.00
//! assert_eq!(price_pizza(&size, &flavors, &catalog).cents(), 5500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod queue;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, MenuItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use store::OrderBook;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Ingredient marker that makes a flavor premium. Matched case-insensitively
/// as a substring.
pub const PREMIUM_INGREDIENT_MARKER: &str = "carne de sol";

/// Maximum flavors on one pizza.
pub const MAX_PIZZA_FLAVORS: usize = 4;

/// Added to the premium price when a premium flavor shares the pizza.
pub const MIXED_PREMIUM_SURCHARGE_CENTS: i64 = 500;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 100 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest price accepted for a menu item or an order line, in cents.
///
/// Keeps `price × MAX_ITEM_QUANTITY` well inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 10_000_000;

/// Maximum lines in one order draft.
pub const MAX_DRAFT_ITEMS: usize = 100;

/// Number of products listed in a sales summary's top list.
pub const TOP_PRODUCTS_LIMIT: usize = 5;
