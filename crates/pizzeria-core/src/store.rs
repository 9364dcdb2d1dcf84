//! # Order Book
//!
//! The canonical collection of active orders plus the delivered archive.
//! Every status change goes through here.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   create()                                                              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  ┌─────────┐ auto_confirm / advance ┌───────────┐ advance ┌───────────┐ │
//! │  │ Pending │───────────────────────►│ Confirmed │────────►│ Preparing │ │
//! │  └─────────┘                        └───────────┘         └─────┬─────┘ │
//! │                                                                 │       │
//! │                          ┌─────────────────┐  deliver  ┌───────▼─────┐  │
//! │                          │ DeliveredOrder  │◄──────────│    Ready    │  │
//! │                          │  (archive)      │           └─────────────┘  │
//! │                          └─────────────────┘                            │
//! │                                                                         │
//! │  Any step other than the immediate successor → InvalidTransition        │
//! │  advance(.., Delivered) → InvalidTransition (only deliver() archives)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle Exclusivity
//! An order id lives in exactly one of `active` or `archive`. `deliver` is a
//! single `&mut self` call, so no caller can observe it in both or neither.
//!
//! Derived views (by status, counts, queue positions) are recomputed on
//! every call from the active list.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::queue::QueuePosition;
use crate::types::{DeliveredOrder, NewOrder, Order, OrderStatus};

/// Active orders and the delivered archive.
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Most recent first.
    active: Vec<Order>,
    /// Delivery order, oldest first. Append-only apart from explicit deletion.
    archive: Vec<DeliveredOrder>,
    next_number: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        OrderBook {
            active: Vec::new(),
            archive: Vec::new(),
            next_number: 1,
        }
    }
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Creates a pending order stamped with the current time.
    pub fn create(&mut self, request: NewOrder) -> CoreResult<Order> {
        self.create_at(request, Utc::now())
    }

    /// Creates a pending order with an explicit creation time.
    ///
    /// ## Behavior
    /// - Validates the request (items present, customer name set)
    /// - Assigns the next order number; numbers are never reused
    /// - Inserts at the head of the active list
    pub fn create_at(&mut self, request: NewOrder, created_at: DateTime<Utc>) -> CoreResult<Order> {
        request.validate()?;

        let (address, table) = request.destination();
        let total_cents = request.total().cents();
        let order = Order {
            id: Uuid::new_v4().to_string(),
            order_number: self.next_number,
            items: request.items,
            customer_name: request.customer_name.trim().to_string(),
            service_type: request.service_type,
            payment_method: request.payment_method,
            address,
            table,
            total_cents,
            status: OrderStatus::Pending,
            created_at,
        };
        self.next_number += 1;

        info!(
            order_id = %order.id,
            order_number = order.order_number,
            total_cents = order.total_cents,
            "Order created"
        );

        self.active.insert(0, order.clone());
        Ok(order)
    }

    /// Moves a pending order to confirmed.
    ///
    /// Returns `false` without touching anything when the order is gone or
    /// already past pending, so a late or repeated timer is harmless.
    pub fn auto_confirm(&mut self, id: &str) -> bool {
        match self.active.iter_mut().find(|o| o.id == id) {
            Some(order) if order.status == OrderStatus::Pending => {
                order.status = OrderStatus::Confirmed;
                debug!(order_id = %id, order_number = order.order_number, "Auto-confirmed order");
                true
            }
            Some(order) => {
                debug!(order_id = %id, status = ?order.status, "Auto-confirm skipped");
                false
            }
            None => {
                debug!(order_id = %id, "Auto-confirm skipped, order no longer active");
                false
            }
        }
    }

    /// Moves an order one step forward.
    ///
    /// `to` must be the immediate successor of the current status and may
    /// not be `Delivered`; use [`OrderBook::deliver`] for that.
    pub fn advance(&mut self, id: &str, to: OrderStatus) -> CoreResult<&Order> {
        let order = self
            .active
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))?;

        let from = order.status;
        if to == OrderStatus::Delivered || from.next() != Some(to) {
            return Err(CoreError::InvalidTransition {
                order_id: id.to_string(),
                from,
                to,
            });
        }

        order.status = to;
        debug!(order_id = %id, from = ?from, to = ?to, "Order advanced");
        Ok(order)
    }

    /// Archives a ready order, stamped with the current time.
    pub fn deliver(&mut self, id: &str) -> CoreResult<DeliveredOrder> {
        self.deliver_at(id, Utc::now())
    }

    /// Archives a ready order with an explicit delivery time.
    pub fn deliver_at(&mut self, id: &str, delivered_at: DateTime<Utc>) -> CoreResult<DeliveredOrder> {
        let index = self.index_of(id)?;

        let from = self.active[index].status;
        if from != OrderStatus::Ready {
            return Err(CoreError::InvalidTransition {
                order_id: id.to_string(),
                from,
                to: OrderStatus::Delivered,
            });
        }

        let mut order = self.active.remove(index);
        order.status = OrderStatus::Delivered;
        let delivered = DeliveredOrder {
            order,
            delivered_at,
        };

        info!(
            order_id = %id,
            order_number = delivered.order.order_number,
            total_cents = delivered.order.total_cents,
            "Order delivered"
        );

        self.archive.push(delivered.clone());
        Ok(delivered)
    }

    /// Deletes an active order in any status.
    pub fn remove(&mut self, id: &str) -> CoreResult<Order> {
        let index = self.index_of(id)?;
        let order = self.active.remove(index);
        info!(order_id = %id, order_number = order.order_number, status = ?order.status, "Order removed");
        Ok(order)
    }

    /// Deletes an archived order. Unknown ids are a silent no-op.
    pub fn delete_delivered(&mut self, id: &str) -> bool {
        let before = self.archive.len();
        self.archive.retain(|d| d.id() != id);
        let deleted = self.archive.len() != before;
        if deleted {
            info!(order_id = %id, "Delivered order deleted");
        }
        deleted
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.active.iter().find(|o| o.id == id)
    }

    pub fn get_delivered(&self, id: &str) -> Option<&DeliveredOrder> {
        self.archive.iter().find(|d| d.id() == id)
    }

    /// Active orders, most recent first.
    pub fn active_orders(&self) -> &[Order] {
        &self.active
    }

    /// Archived orders in delivery order, oldest first.
    pub fn archive(&self) -> &[DeliveredOrder] {
        &self.archive
    }

    /// Archived orders, most recently delivered first.
    pub fn delivered_orders(&self) -> impl Iterator<Item = &DeliveredOrder> {
        self.archive.iter().rev()
    }

    /// Active orders with `status`, keeping their relative order.
    pub fn by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.active.iter().filter(|o| o.status == status).collect()
    }

    /// Rank of a confirmed order among all confirmed orders, by order number.
    ///
    /// `None` when the order is unknown or not confirmed.
    pub fn queue_position(&self, id: &str) -> Option<QueuePosition> {
        let order = self.get(id)?;
        if order.status != OrderStatus::Confirmed {
            return None;
        }

        let ahead = self
            .active
            .iter()
            .filter(|o| o.status == OrderStatus::Confirmed && o.order_number < order.order_number)
            .count();
        Some(QueuePosition::new(ahead + 1))
    }

    pub fn pending_count(&self) -> usize {
        self.active
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count()
    }

    /// Orders in confirmed, preparing or ready.
    pub fn kitchen_count(&self) -> usize {
        self.active.iter().filter(|o| o.status.is_kitchen()).count()
    }

    /// The `limit` most recent active orders.
    pub fn recent_orders(&self, limit: usize) -> &[Order] {
        &self.active[..limit.min(self.active.len())]
    }

    /// The number the next created order will get.
    pub fn next_order_number(&self) -> u64 {
        self.next_number
    }

    fn index_of(&self, id: &str) -> CoreResult<usize> {
        self.active
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{category, MenuItem};
    use crate::types::{OrderItem, PaymentMethod, ServiceType};
    use proptest::prelude::*;

    fn line(price_cents: i64, quantity: i64) -> OrderItem {
        let mut line = OrderItem::from_menu_item(&MenuItem::new("x", "X", price_cents, category::PASTRY));
        line.quantity = quantity;
        line
    }

    fn request(customer: &str) -> NewOrder {
        NewOrder {
            customer_name: customer.to_string(),
            items: vec![line(600, 2)],
            service_type: ServiceType::Pickup,
            payment_method: PaymentMethod::Cash,
            address: None,
            table: None,
        }
    }

    fn ready_order(book: &mut OrderBook, customer: &str) -> String {
        let id = book.create(request(customer)).unwrap().id;
        assert!(book.auto_confirm(&id));
        book.advance(&id, OrderStatus::Preparing).unwrap();
        book.advance(&id, OrderStatus::Ready).unwrap();
        id
    }

    /// Exactly one of active or archive holds the id.
    fn assert_exclusive(book: &OrderBook, id: &str) {
        let active = OrderStatus::ALL
            .iter()
            .filter(|s| book.by_status(**s).iter().any(|o| o.id == id))
            .count();
        let archived = book.archive().iter().filter(|d| d.id() == id).count();
        assert_eq!(active + archived, 1);
    }

    #[test]
    fn test_create_assigns_sequential_numbers() {
        let mut book = OrderBook::new();
        let a = book.create(request("Ana")).unwrap();
        let b = book.create(request("Bia")).unwrap();

        assert_eq!(a.order_number, 1);
        assert_eq!(b.order_number, 2);
        assert_eq!(a.status, OrderStatus::Pending);
        assert_eq!(a.total_cents, 1200);
        assert_eq!(book.next_order_number(), 3);

        // Most recent first.
        assert_eq!(book.active_orders()[0].id, b.id);
    }

    #[test]
    fn test_numbers_are_never_reused() {
        let mut book = OrderBook::new();
        let a = book.create(request("Ana")).unwrap();
        book.remove(&a.id).unwrap();
        let b = book.create(request("Bia")).unwrap();
        assert_eq!(b.order_number, 2);
    }

    #[test]
    fn test_create_rejects_invalid_request() {
        let mut book = OrderBook::new();
        let mut empty = request("Ana");
        empty.items.clear();

        assert!(matches!(book.create(empty), Err(CoreError::InvalidOrder { .. })));
        assert!(matches!(book.create(request(" ")), Err(CoreError::InvalidOrder { .. })));
        assert!(book.active_orders().is_empty());
        assert_eq!(book.next_order_number(), 1);
    }

    #[test]
    fn test_create_rejects_negative_line_price() {
        let mut book = OrderBook::new();
        let mut refund = request("Ana");
        refund.items = vec![line(-5000, 1)];

        assert!(matches!(book.create(refund), Err(CoreError::Validation(_))));
        assert!(book.active_orders().is_empty());
        assert_eq!(book.next_order_number(), 1);
    }

    #[test]
    fn test_forward_only_transitions() {
        let mut book = OrderBook::new();
        let id = book.create(request("Ana")).unwrap().id;
        book.auto_confirm(&id);

        let err = book.advance(&id, OrderStatus::Ready).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTransition {
                from: OrderStatus::Confirmed,
                to: OrderStatus::Ready,
                ..
            }
        ));
        assert_eq!(book.get(&id).unwrap().status, OrderStatus::Confirmed);

        let order = book.advance(&id, OrderStatus::Preparing).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);

        assert!(book.advance(&id, OrderStatus::Confirmed).is_err());
    }

    #[test]
    fn test_manual_confirm_is_a_successor_step() {
        let mut book = OrderBook::new();
        let id = book.create(request("Ana")).unwrap().id;
        book.advance(&id, OrderStatus::Confirmed).unwrap();
        assert!(!book.auto_confirm(&id));
    }

    #[test]
    fn test_advance_never_delivers() {
        let mut book = OrderBook::new();
        let id = ready_order(&mut book, "Ana");

        assert!(book.advance(&id, OrderStatus::Delivered).is_err());
        assert_eq!(book.get(&id).unwrap().status, OrderStatus::Ready);
        assert!(book.archive().is_empty());
    }

    #[test]
    fn test_advance_unknown_order() {
        let mut book = OrderBook::new();
        assert!(matches!(
            book.advance("ghost", OrderStatus::Preparing),
            Err(CoreError::OrderNotFound(_))
        ));
    }

    #[test]
    fn test_deliver_requires_ready() {
        let mut book = OrderBook::new();
        let id = book.create(request("Ana")).unwrap().id;
        book.auto_confirm(&id);

        assert!(matches!(
            book.deliver(&id),
            Err(CoreError::InvalidTransition {
                to: OrderStatus::Delivered,
                ..
            })
        ));
        assert!(matches!(book.deliver("ghost"), Err(CoreError::OrderNotFound(_))));
        assert_exclusive(&book, &id);
    }

    #[test]
    fn test_lifecycle_exclusivity() {
        let mut book = OrderBook::new();
        let id = book.create(request("Ana")).unwrap().id;
        assert_exclusive(&book, &id);

        book.auto_confirm(&id);
        assert_exclusive(&book, &id);
        book.advance(&id, OrderStatus::Preparing).unwrap();
        assert_exclusive(&book, &id);
        book.advance(&id, OrderStatus::Ready).unwrap();
        assert_exclusive(&book, &id);

        let delivered = book.deliver(&id).unwrap();
        assert_exclusive(&book, &id);
        assert!(book.get(&id).is_none());
        assert_eq!(delivered.order.status, OrderStatus::Delivered);
    }

    #[test]
    fn test_queue_position_recomputes() {
        let mut book = OrderBook::new();
        let a = book.create(request("A")).unwrap().id;
        let b = book.create(request("B")).unwrap().id;
        let c = book.create(request("C")).unwrap().id;
        for id in [&c, &a, &b] {
            book.auto_confirm(id);
        }

        assert_eq!(book.queue_position(&a), Some(QueuePosition::new(1)));
        assert_eq!(book.queue_position(&b), Some(QueuePosition::new(2)));
        assert_eq!(book.queue_position(&c), Some(QueuePosition::new(3)));

        book.advance(&a, OrderStatus::Preparing).unwrap();

        assert_eq!(book.queue_position(&a), None);
        assert_eq!(book.queue_position(&b), Some(QueuePosition::new(1)));
        assert_eq!(book.queue_position(&c), Some(QueuePosition::new(2)));
    }

    #[test]
    fn test_auto_confirm_is_idempotent() {
        let mut book = OrderBook::new();
        let id = book.create(request("Ana")).unwrap().id;

        assert!(book.auto_confirm(&id));
        let confirmed: Vec<String> = book
            .by_status(OrderStatus::Confirmed)
            .iter()
            .map(|o| o.id.clone())
            .collect();

        assert!(!book.auto_confirm(&id));
        assert_eq!(book.get(&id).unwrap().status, OrderStatus::Confirmed);
        let again: Vec<String> = book
            .by_status(OrderStatus::Confirmed)
            .iter()
            .map(|o| o.id.clone())
            .collect();
        assert_eq!(confirmed, again);
    }

    #[test]
    fn test_auto_confirm_after_removal_is_noop() {
        let mut book = OrderBook::new();
        let id = book.create(request("Ana")).unwrap().id;
        book.remove(&id).unwrap();

        assert!(!book.auto_confirm(&id));
        assert_eq!(book.pending_count(), 0);
    }

    #[test]
    fn test_by_status_is_stable() {
        let mut book = OrderBook::new();
        let a = book.create(request("A")).unwrap().id;
        let b = book.create(request("B")).unwrap().id;
        let c = book.create(request("C")).unwrap().id;
        book.auto_confirm(&a);
        book.auto_confirm(&c);

        let confirmed: Vec<&str> = book
            .by_status(OrderStatus::Confirmed)
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(confirmed, vec![c.as_str(), a.as_str()]);
        assert_eq!(book.pending_count(), 1);
        assert_eq!(book.kitchen_count(), 2);
        assert_eq!(book.by_status(OrderStatus::Pending)[0].id, b);
    }

    #[test]
    fn test_delivered_orders_most_recent_first() {
        let mut book = OrderBook::new();
        let a = ready_order(&mut book, "A");
        let b = ready_order(&mut book, "B");
        book.deliver(&a).unwrap();
        book.deliver(&b).unwrap();

        let ids: Vec<&str> = book.delivered_orders().map(|d| d.id()).collect();
        assert_eq!(ids, vec![b.as_str(), a.as_str()]);
        assert_eq!(book.kitchen_count(), 0);
    }

    #[test]
    fn test_delete_delivered_never_fails() {
        let mut book = OrderBook::new();
        let id = ready_order(&mut book, "Ana");
        book.deliver(&id).unwrap();

        assert!(!book.delete_delivered("ghost"));
        assert!(book.delete_delivered(&id));
        assert!(!book.delete_delivered(&id));
        assert!(book.get_delivered(&id).is_none());
    }

    #[test]
    fn test_recent_orders() {
        let mut book = OrderBook::new();
        for name in ["A", "B", "C"] {
            book.create(request(name)).unwrap();
        }

        let recent: Vec<u64> = book.recent_orders(2).iter().map(|o| o.order_number).collect();
        assert_eq!(recent, vec![3, 2]);
        assert_eq!(book.recent_orders(10).len(), 3);
    }

    proptest! {
        #[test]
        fn prop_total_matches_lines(lines in prop::collection::vec((0i64..20_000, 1i64..=999), 1..12)) {
            let mut book = OrderBook::new();
            let mut req = request("Ana");
            req.items = lines.iter().map(|(price, qty)| line(*price, *qty)).collect();

            let order = book.create(req).unwrap();
            let expected: i64 = lines.iter().map(|(price, qty)| price * qty).sum();
            prop_assert_eq!(order.total_cents, expected);
            prop_assert_eq!(order.total(), order.items_total());
        }
    }
}
