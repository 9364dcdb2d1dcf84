//! # Order Service
//!
//! The process-wide owner of the order book. Counter, kitchen and reporting
//! all go through one `OrderService`, cloned cheaply where needed.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  submit_order (A) ── validate ── sleep(1s) ──┐                          │
//! │  submit_order (B) ── validate ── sleep(1s) ──┤  delays overlap          │
//! │                                              ▼                          │
//! │                               ┌──────────────────────────┐              │
//! │  advance / deliver ──────────►│  Mutex<OrderBook>        │◄── timers    │
//! │  queries ────────────────────►│  one writer at a time    │              │
//! │                               └──────────────────────────┘              │
//! │                                                                         │
//! │  The lock is never held across a sleep. `deliver` runs entirely under   │
//! │  one lock, so no query sees an order in both or neither collection.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use pizzeria_core::analytics::{PeriodSpec, SalesReport};
use pizzeria_core::queue::{KitchenQueue, QueuePosition};
use pizzeria_core::{DeliveredOrder, NewOrder, Order, OrderBook, OrderStatus};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::PizzeriaConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::scheduler::ConfirmScheduler;

#[derive(Debug, Clone)]
pub struct OrderService {
    book: Arc<Mutex<OrderBook>>,
    scheduler: ConfirmScheduler,
    submission_delay: Duration,
    recent_orders_limit: usize,
    shutting_down: Arc<AtomicBool>,
}

impl OrderService {
    pub fn new(config: &PizzeriaConfig) -> Self {
        let book = Arc::new(Mutex::new(OrderBook::new()));
        let scheduler = ConfirmScheduler::new(Arc::clone(&book), config.auto_confirm_delay());

        OrderService {
            book,
            scheduler,
            submission_delay: config.submission_delay(),
            recent_orders_limit: config.kitchen.recent_orders_limit,
            shutting_down: Arc::new(AtomicBool::new(false)),
        }
    }

    fn ensure_running(&self) -> ServiceResult<()> {
        if self.shutting_down.load(Ordering::SeqCst) {
            return Err(ServiceError::ShuttingDown);
        }
        Ok(())
    }

    // =========================================================================
    // Intake
    // =========================================================================

    /// Submits an order.
    ///
    /// ## Flow
    /// 1. Validate (empty cart and blank name fail immediately)
    /// 2. Wait the submission delay without holding any lock
    /// 3. Create the order as pending
    /// 4. Schedule its auto-confirmation
    ///
    /// A shutdown landing between steps 3 and 4 leaves the order pending
    /// with no timer.
    pub async fn submit_order(&self, request: NewOrder) -> ServiceResult<Order> {
        self.ensure_running()?;
        request.validate()?;

        tokio::time::sleep(self.submission_delay).await;
        self.ensure_running()?;

        let order = self.book.lock().await.create(request)?;
        if !self.scheduler.schedule(order.id.clone()) {
            warn!(order_id = %order.id, "Order created during shutdown, auto-confirm skipped");
        }

        Ok(order)
    }

    // =========================================================================
    // Kitchen Operations
    // =========================================================================

    pub async fn advance_status(&self, order_id: &str, to: OrderStatus) -> ServiceResult<Order> {
        let mut book = self.book.lock().await;
        let order = book.advance(order_id, to)?.clone();
        if to == OrderStatus::Confirmed {
            self.scheduler.cancel(order_id);
        }
        Ok(order)
    }

    pub async fn deliver(&self, order_id: &str) -> ServiceResult<DeliveredOrder> {
        Ok(self.book.lock().await.deliver(order_id)?)
    }

    /// Deletes an active order and stops its timer.
    pub async fn remove_order(&self, order_id: &str) -> ServiceResult<Order> {
        let order = self.book.lock().await.remove(order_id)?;
        self.scheduler.cancel(order_id);
        Ok(order)
    }

    pub async fn delete_delivered(&self, order_id: &str) -> bool {
        self.book.lock().await.delete_delivered(order_id)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub async fn order(&self, order_id: &str) -> Option<Order> {
        self.book.lock().await.get(order_id).cloned()
    }

    /// Active orders, most recent first.
    pub async fn active_orders(&self) -> Vec<Order> {
        self.book.lock().await.active_orders().to_vec()
    }

    pub async fn orders_by_status(&self, status: OrderStatus) -> Vec<Order> {
        self.book
            .lock()
            .await
            .by_status(status)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn pending_count(&self) -> usize {
        self.book.lock().await.pending_count()
    }

    pub async fn kitchen_count(&self) -> usize {
        self.book.lock().await.kitchen_count()
    }

    pub async fn queue_position(&self, order_id: &str) -> Option<QueuePosition> {
        self.book.lock().await.queue_position(order_id)
    }

    pub async fn kitchen_queue(&self) -> KitchenQueue {
        KitchenQueue::from_book(&*self.book.lock().await)
    }

    /// The configured number of most recent active orders.
    pub async fn recent_orders(&self) -> Vec<Order> {
        self.book
            .lock()
            .await
            .recent_orders(self.recent_orders_limit)
            .to_vec()
    }

    /// Archive, most recently delivered first.
    pub async fn delivered_orders(&self) -> Vec<DeliveredOrder> {
        self.book.lock().await.delivered_orders().cloned().collect()
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Sales report against the local clock.
    pub async fn sales_report(&self, period: PeriodSpec) -> SalesReport {
        self.sales_report_at(period, &Local::now()).await
    }

    pub async fn sales_report_at<Tz: TimeZone>(&self, period: PeriodSpec, reference: &DateTime<Tz>) -> SalesReport {
        let report = SalesReport::build(self.book.lock().await.archive(), &period, reference);
        info!(
            period = %report.period,
            orders = report.total_orders,
            revenue_cents = report.total_revenue.cents(),
            "Sales report built"
        );
        report
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Stops accepting orders and aborts pending confirmation timers.
    ///
    /// Orders already in the book stay where they are.
    pub fn shutdown(&self) {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            warn!("Order service already shut down");
            return;
        }
        self.scheduler.shutdown();
        info!("Order service shut down");
    }

    pub fn scheduler(&self) -> &ConfirmScheduler {
        &self.scheduler
    }
}
