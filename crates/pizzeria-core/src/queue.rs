//! # Kitchen Queue View
//!
//! Read-only snapshots of the kitchen board derived from the [`OrderBook`].
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │    Confirmed     │   │    Preparing     │   │      Ready       │
//! │  1ª  #3 Ana      │   │  #1 Caio         │   │  #2 Bia          │
//! │  2ª  #5 Davi     │   │                  │   │                  │
//! └──────────────────┘   └──────────────────┘   └──────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::store::OrderBook;
use crate::types::{Order, OrderStatus};

/// 1-based rank of a confirmed order in the kitchen queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QueuePosition(usize);

impl QueuePosition {
    pub const fn new(position: usize) -> Self {
        QueuePosition(position)
    }

    #[inline]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Ordinal label shown on the board: `1ª`, `2ª`, ...
    pub fn label(&self) -> String {
        format!("{}ª", self.0)
    }
}

impl fmt::Display for QueuePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ª", self.0)
    }
}

/// A confirmed order with its place in line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub position: QueuePosition,
    pub order: Order,
}

/// Snapshot of the kitchen board.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct KitchenQueue {
    /// Confirmed orders in queue order (oldest order number first).
    pub confirmed: Vec<QueueEntry>,
    /// Most recent first.
    pub preparing: Vec<Order>,
    /// Most recent first.
    pub ready: Vec<Order>,
    pub pending_count: usize,
    pub kitchen_count: usize,
}

impl KitchenQueue {
    pub fn from_book(book: &OrderBook) -> Self {
        let mut confirmed: Vec<&Order> = book.by_status(OrderStatus::Confirmed);
        confirmed.sort_by_key(|o| o.order_number);

        let confirmed = confirmed
            .into_iter()
            .enumerate()
            .map(|(i, order)| QueueEntry {
                position: QueuePosition::new(i + 1),
                order: order.clone(),
            })
            .collect();

        let owned = |status| {
            book.by_status(status)
                .into_iter()
                .cloned()
                .collect::<Vec<Order>>()
        };

        KitchenQueue {
            confirmed,
            preparing: owned(OrderStatus::Preparing),
            ready: owned(OrderStatus::Ready),
            pending_count: book.pending_count(),
            kitchen_count: book.kitchen_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty() && self.preparing.is_empty() && self.ready.is_empty()
    }
}
