//! # Order Draft
//!
//! The order being assembled at the counter before submission.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Operations                                     │
//! │                                                                         │
//! │  Counter Action           Draft Method            State Change          │
//! │  ──────────────           ────────────            ────────────          │
//! │                                                                         │
//! │  Tap drink/pastel ───────► add_menu_item() ─────► items.push(line)      │
//! │                                                                         │
//! │  Confirm pizza ──────────► add_item() ──────────► items.push(line)      │
//! │                                                                         │
//! │  Change quantity ────────► update_quantity() ───► items[i].qty = n      │
//! │                                                                         │
//! │  Type a note ────────────► update_note() ───────► items[i].note = s     │
//! │                                                                         │
//! │  Tap remove ─────────────► remove() ────────────► items.remove(i)       │
//! │                                                                         │
//! │  Submit ─────────────────► into_items() ────────► NewOrder.items        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are addressed by index. Two pizzas with the same flavors are two
//! separate lines, so there is no merge-by-id like a retail cart.

use serde::{Deserialize, Serialize};

use crate::catalog::MenuItem;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::OrderItem;
use crate::validation::{validate_note, validate_quantity};
use crate::MAX_DRAFT_ITEMS;

/// Lines waiting to be submitted.
///
/// ## Invariants
/// - Every line has quantity in 1..=999
/// - At most 100 lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    items: Vec<OrderItem>,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of a menu item at its current base price.
    pub fn add_menu_item(&mut self, item: &MenuItem) -> CoreResult<usize> {
        self.add_item(OrderItem::from_menu_item(item))
    }

    /// Appends a prepared line and returns its index.
    pub fn add_item(&mut self, line: OrderItem) -> CoreResult<usize> {
        validate_quantity(line.quantity)?;

        if self.items.len() >= MAX_DRAFT_ITEMS {
            return Err(ValidationError::OutOfRange {
                field: "order lines".to_string(),
                min: 1,
                max: MAX_DRAFT_ITEMS as i64,
            }
            .into());
        }

        self.items.push(line);
        Ok(self.items.len() - 1)
    }

    /// Sets the quantity of a line.
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;
        self.line_mut(index)?.quantity = quantity;
        Ok(())
    }

    /// Sets or clears the kitchen note of a line. Blank notes clear it.
    pub fn update_note(&mut self, index: usize, note: Option<String>) -> CoreResult<()> {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(n) = &note {
            validate_note(n)?;
        }
        self.line_mut(index)?.note = note;
        Ok(())
    }

    /// Removes a line and returns it.
    pub fn remove(&mut self, index: usize) -> CoreResult<OrderItem> {
        if index >= self.items.len() {
            return Err(CoreError::CartItemNotFound(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line totals.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Hands the lines over for submission.
    pub fn into_items(self) -> Vec<OrderItem> {
        self.items
    }

    fn line_mut(&mut self, index: usize) -> CoreResult<&mut OrderItem> {
        self.items
            .get_mut(index)
            .ok_or(CoreError::CartItemNotFound(index))
    }
}
