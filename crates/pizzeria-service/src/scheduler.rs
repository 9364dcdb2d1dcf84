//! # Auto-Confirm Scheduler
//!
//! One delayed task per pending order. When the delay elapses the task asks
//! the order book to confirm the order; the book re-checks the status, so a
//! task firing for an order that was advanced or deleted does nothing.
//!
//! ## Task Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  schedule(id) ──► tokio::spawn ──► sleep(delay) ──► lock book           │
//! │       │                                               │                 │
//! │       │                                   auto_confirm(id) (idempotent) │
//! │       ▼                                               │                 │
//! │  tasks[id] = AbortHandle ◄──── remove own entry ◄─────┘                 │
//! │                                                                         │
//! │  cancel(id)  ──► tasks.remove(id).abort()                               │
//! │  shutdown()  ──► close, abort every task; later schedule() is refused   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use pizzeria_core::OrderBook;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tracing::debug;

#[derive(Debug, Default)]
struct TaskMap {
    handles: HashMap<String, AbortHandle>,
    closed: bool,
}

/// Keyed delayed confirmations.
///
/// The task map sits behind a std mutex: it is never held across an await.
/// `closed` lives under the same lock, so a `schedule` racing `shutdown`
/// either lands before the drain or is refused.
#[derive(Debug, Clone)]
pub struct ConfirmScheduler {
    book: Arc<Mutex<OrderBook>>,
    delay: Duration,
    tasks: Arc<StdMutex<TaskMap>>,
}

fn lock(tasks: &StdMutex<TaskMap>) -> MutexGuard<'_, TaskMap> {
    tasks.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConfirmScheduler {
    pub fn new(book: Arc<Mutex<OrderBook>>, delay: Duration) -> Self {
        ConfirmScheduler {
            book,
            delay,
            tasks: Arc::new(StdMutex::new(TaskMap::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Starts the confirmation timer for an order. Must be called from
    /// within a tokio runtime.
    ///
    /// Returns `false` without spawning anything once the scheduler has
    /// been shut down.
    pub fn schedule(&self, order_id: impl Into<String>) -> bool {
        let order_id = order_id.into();
        let book = Arc::clone(&self.book);
        let tasks = Arc::clone(&self.tasks);
        let delay = self.delay;
        let id = order_id.clone();

        // Held until the handle is stored so the task cannot remove its
        // entry before it exists.
        let mut map = lock(&self.tasks);
        if map.closed {
            debug!(order_id = %order_id, "Scheduler shut down, timer not started");
            return false;
        }

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let confirmed = book.lock().await.auto_confirm(&id);
            lock(&tasks).handles.remove(&id);

            debug!(order_id = %id, confirmed, "Auto-confirm timer fired");
        });

        if let Some(previous) = map.handles.insert(order_id, handle.abort_handle()) {
            previous.abort();
        }
        true
    }

    /// Stops the timer for an order. Returns `true` if one was running.
    pub fn cancel(&self, order_id: &str) -> bool {
        match lock(&self.tasks).handles.remove(order_id) {
            Some(handle) => {
                handle.abort();
                debug!(order_id = %order_id, "Auto-confirm timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Number of timers that have not fired yet.
    pub fn pending(&self) -> usize {
        lock(&self.tasks).handles.len()
    }

    pub fn is_scheduled(&self, order_id: &str) -> bool {
        lock(&self.tasks).handles.contains_key(order_id)
    }

    /// Aborts every outstanding timer and refuses new ones.
    pub fn shutdown(&self) {
        let drained: Vec<(String, AbortHandle)> = {
            let mut map = lock(&self.tasks);
            map.closed = true;
            map.handles.drain().collect()
        };
        debug!(count = drained.len(), "Aborting auto-confirm timers");
        for (_, handle) in drained {
            handle.abort();
        }
    }
}
