//! # pizzeria-service: Async Order Service
//!
//! Explicit service objects that own the restaurant's shared state. One of
//! each is created per process and handed to whatever needs it; there are no
//! global singletons.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌────────────────────┐        ┌────────────────────────────────────┐   │
//! │  │  MenuState         │        │  OrderService                      │   │
//! │  │  RwLock<Catalog>   │        │  Mutex<OrderBook>                  │   │
//! │  │                    │        │                                    │   │
//! │  │  edits, pricing,   │ items  │  submit ─► create ─► schedule ─┐   │   │
//! │  │  pizza confirm     │───────►│  advance / deliver / remove    │   │   │
//! │  └────────────────────┘        │  queries, kitchen queue,       │   │   │
//! │                                │  sales report                  │   │   │
//! │                                └────────────────────────────────┼───┘   │
//! │                                                                 ▼       │
//! │                                ┌────────────────────────────────────┐   │
//! │                                │  ConfirmScheduler                  │   │
//! │                                │  order id ─► AbortHandle           │   │
//! │                                └────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pizzeria_service::{OrderService, PizzeriaConfig};
//!
//! let config = PizzeriaConfig::load_or_default(None);
//! let orders = OrderService::new(&config);
//!
//! let order = orders.submit_order(request).await?;
//! // ...two seconds later the order is confirmed automatically
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod menu;
pub mod scheduler;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::PizzeriaConfig;
pub use error::{ServiceError, ServiceResult};
pub use menu::MenuState;
pub use scheduler::ConfirmScheduler;
pub use service::OrderService;
