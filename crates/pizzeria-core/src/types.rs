//! # Domain Types
//!
//! Order-side types shared by the order book, the kitchen queue and the
//! analytics aggregator. Menu items live in [`crate::catalog`].
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    OrderItem    │   │      Order      │   │ DeliveredOrder  │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  MenuItem snap  │◄──│  id (UUID)      │◄──│  Order snapshot │        │
//! │  │  quantity       │   │  order_number   │   │  delivered_at   │        │
//! │  │  size/flavors   │   │  status         │   └─────────────────┘        │
//! │  │  unit price     │   │  total_cents    │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │   OrderStatus   │   │   ServiceType   │   │ PaymentMethod   │        │
//! │  │  Pending        │   │  Delivery       │   │  Pix            │        │
//! │  │  Confirmed      │   │  Pickup         │   │  Card           │        │
//! │  │  Preparing      │   │  Table          │   │  Cash           │        │
//! │  │  Ready          │   └─────────────────┘   └─────────────────┘        │
//! │  │  Delivered      │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every order has:
//! - `id`: UUID v4, assigned at submission, used by every operation
//! - `order_number`: sequential, human-facing, and the FIFO key of the kitchen

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::catalog::MenuItem;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_customer_name, validate_note, validate_price_cents, validate_quantity};

// =============================================================================
// Order Status
// =============================================================================

/// Position of an order in its lifecycle.
///
/// ```text
/// Pending ──► Confirmed ──► Preparing ──► Ready ──► Delivered (archive)
///   │             ▲
///   └─ auto ──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted, waiting for the kitchen to accept it.
    Pending,
    /// Accepted into the kitchen queue.
    Confirmed,
    /// Being cooked.
    Preparing,
    /// Waiting for pickup, table service or the courier.
    Ready,
    /// Handed over; only ever seen on archived orders.
    Delivered,
}

impl OrderStatus {
    /// Every status in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ];

    /// The immediate successor, or `None` for the terminal state.
    pub const fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    /// True for the statuses shown on the kitchen board.
    pub const fn is_kitchen(&self) -> bool {
        matches!(
            self,
            OrderStatus::Confirmed | OrderStatus::Preparing | OrderStatus::Ready
        )
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Service Type & Payment Method
// =============================================================================

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Delivery,
    Pickup,
    Table,
}

impl Default for ServiceType {
    fn default() -> Self {
        ServiceType::Table
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Delivery => write!(f, "delivery"),
            ServiceType::Pickup => write!(f, "pickup"),
            ServiceType::Table => write!(f, "table"),
        }
    }
}

/// Payment method recorded on the order. No payment is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Instant bank transfer.
    Pix,
    Card,
    Cash,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Pix
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Pix => write!(f, "PIX"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Cash => write!(f, "cash"),
        }
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line of an order: a frozen copy of the menu item plus what the
/// customer chose.
///
/// ## Snapshot Pattern
/// The menu item is copied when the line is created. Later catalog edits
/// (price changes, ingredient edits) never touch lines already in a draft
/// or an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Menu item at the time the line was created (frozen).
    #[serde(flatten)]
    pub item: MenuItem,

    pub quantity: i64,

    /// Pizza size name, for composite pizzas.
    pub selected_size: Option<String>,

    /// Flavor ids in selection order, for composite pizzas.
    pub selected_flavors: Option<Vec<String>>,

    /// Free-text kitchen note ("no onion").
    pub note: Option<String>,

    /// Price of one unit in cents (frozen).
    pub unit_price_cents: i64,
}

impl OrderItem {
    /// A plain menu line: one unit at the item's base price.
    pub fn from_menu_item(item: &MenuItem) -> Self {
        OrderItem {
            unit_price_cents: item.base_price_cents,
            item: item.clone(),
            quantity: 1,
            selected_size: None,
            selected_flavors: None,
            note: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.item.name
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// True for lines built by the pizza builder.
    pub fn is_composite(&self) -> bool {
        self.selected_flavors.is_some()
    }
}

// =============================================================================
// New Order (submission request)
// =============================================================================

/// Everything the counter sends when submitting an order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub service_type: ServiceType,
    pub payment_method: PaymentMethod,
    pub address: Option<String>,
    pub table: Option<String>,
}

impl NewOrder {
    /// Checks the submission rules.
    ///
    /// ## Rules
    /// - At least one item
    /// - Customer name not blank
    /// - Every line has a valid quantity, unit price and note
    pub fn validate(&self) -> CoreResult<()> {
        if self.items.is_empty() {
            return Err(CoreError::invalid_order("order has no items"));
        }

        if self.customer_name.trim().is_empty() {
            return Err(CoreError::invalid_order("customer name is required"));
        }
        validate_customer_name(&self.customer_name)?;

        for item in &self.items {
            validate_quantity(item.quantity)?;
            validate_price_cents(item.unit_price_cents)?;
            if let Some(note) = &item.note {
                validate_note(note)?;
            }
        }

        Ok(())
    }

    /// Sum of line totals.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Address only applies to deliveries, table only to table service.
    pub(crate) fn destination(&self) -> (Option<String>, Option<String>) {
        let keep = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        match self.service_type {
            ServiceType::Delivery => (keep(&self.address), None),
            ServiceType::Table => (None, keep(&self.table)),
            ServiceType::Pickup => (None, None),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A submitted order owned by the order book.
///
/// ## Invariants
/// - `total_cents` equals the sum of `unit_price_cents × quantity` over items
/// - `order_number` is unique and never reused
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: u64,
    pub items: Vec<OrderItem>,
    pub customer_name: String,
    pub service_type: ServiceType,
    pub payment_method: PaymentMethod,
    pub address: Option<String>,
    pub table: Option<String>,
    pub total_cents: i64,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Recomputes the total from the lines.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

// =============================================================================
// Delivered Order
// =============================================================================

/// An archived order. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveredOrder {
    #[serde(flatten)]
    pub order: Order,
    #[ts(as = "String")]
    pub delivered_at: DateTime<Utc>,
}

impl DeliveredOrder {
    #[inline]
    pub fn id(&self) -> &str {
        &self.order.id
    }

    #[inline]
    pub fn total(&self) -> Money {
        self.order.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MenuItem;
    use crate::error::ValidationError;

    fn drink() -> MenuItem {
        MenuItem::new("suco-laranja", "Suco Natural de Laranja", 800, "Bebida")
    }

    fn request(items: Vec<OrderItem>, name: &str) -> NewOrder {
        NewOrder {
            customer_name: name.to_string(),
            items,
            service_type: ServiceType::Table,
            payment_method: PaymentMethod::Pix,
            address: Some("Rua A, 10".to_string()),
            table: Some(" 7 ".to_string()),
        }
    }

    #[test]
    fn test_status_successors() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Confirmed));
        assert_eq!(OrderStatus::Confirmed.next(), Some(OrderStatus::Preparing));
        assert_eq!(OrderStatus::Preparing.next(), Some(OrderStatus::Ready));
        assert_eq!(OrderStatus::Ready.next(), Some(OrderStatus::Delivered));
        assert_eq!(OrderStatus::Delivered.next(), None);
    }

    #[test]
    fn test_kitchen_statuses() {
        let kitchen: Vec<_> = OrderStatus::ALL.iter().filter(|s| s.is_kitchen()).collect();
        assert_eq!(
            kitchen,
            vec![&OrderStatus::Confirmed, &OrderStatus::Preparing, &OrderStatus::Ready]
        );
    }

    #[test]
    fn test_line_total() {
        let mut line = OrderItem::from_menu_item(&drink());
        line.quantity = 3;
        assert_eq!(line.line_total().cents(), 2400);
        assert!(!line.is_composite());
    }

    #[test]
    fn test_new_order_rejects_empty_cart() {
        let err = request(Vec::new(), "Ana").validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidOrder { .. }));
    }

    #[test]
    fn test_new_order_rejects_blank_customer() {
        let items = vec![OrderItem::from_menu_item(&drink())];
        let err = request(items, "   ").validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidOrder { .. }));
    }

    #[test]
    fn test_new_order_rejects_bad_unit_price() {
        let mut line = OrderItem::from_menu_item(&drink());
        line.unit_price_cents = -5000;
        let err = request(vec![line.clone()], "Ana").validate().unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));

        line.unit_price_cents = i64::MAX;
        assert!(request(vec![line], "Ana").validate().is_err());
    }

    #[test]
    fn test_destination_follows_service_type() {
        let items = vec![OrderItem::from_menu_item(&drink())];
        let mut order = request(items, "Ana");
        assert_eq!(order.destination(), (None, Some("7".to_string())));

        order.service_type = ServiceType::Delivery;
        assert_eq!(order.destination(), (Some("Rua A, 10".to_string()), None));

        order.service_type = ServiceType::Pickup;
        assert_eq!(order.destination(), (None, None));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"preparing\"");
    }
}
