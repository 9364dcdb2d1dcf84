//! # Pricing Engine
//!
//! Deterministic prices for plain menu lines and for composite pizzas, plus
//! the [`PizzaBuilder`] that assembles a composite pizza line at the counter.
//!
//! ## Pizza Price Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  has_premium = any selected flavor is premium                           │
//! │                                                                         │
//! │  has_premium && flavors > 1  ──► premium price (or base) + 5.00         │
//! │  has_premium                 ──► premium price (or base)                │
//! │  otherwise                   ──► base price                             │
//! │                                                                         │
//! │  Size G: base 45.00, premium 50.00                                      │
//! │    [Carne de Sol]               → 50.00                                 │
//! │    [Carne de Sol, Calabresa]    → 55.00                                 │
//! │    [Calabresa, Frango]          → 45.00                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Flavors are priced through the size; the flavor items themselves carry
//! a base price of zero.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::{category, contains_premium, Catalog, MenuItem};
use crate::money::Money;
use crate::types::OrderItem;
use crate::{MAX_PIZZA_FLAVORS, MIXED_PREMIUM_SURCHARGE_CENTS};

// =============================================================================
// Pizza Size
// =============================================================================

/// A pizza size with its price tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PizzaSize {
    pub name: String,
    pub price_cents: i64,
    /// Price when a premium flavor is selected. Falls back to `price_cents`.
    pub premium_price_cents: Option<i64>,
    pub description: String,
}

impl PizzaSize {
    pub fn new(name: impl Into<String>, price_cents: i64, premium_price_cents: Option<i64>) -> Self {
        PizzaSize {
            name: name.into(),
            price_cents,
            premium_price_cents,
            description: String::new(),
        }
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Premium tier, or the base price when the size has none.
    #[inline]
    pub fn premium_price(&self) -> Money {
        Money::from_cents(self.premium_price_cents.unwrap_or(self.price_cents))
    }
}

/// The house size table, smallest first.
pub fn house_sizes() -> Vec<PizzaSize> {
    [
        ("Brotinho", 1000, None, "Ideal para 1 pessoa"),
        ("P (4 fatias)", 2500, Some(3000), "Perfeita para 1-2 pessoas"),
        ("M (6 fatias)", 3500, Some(4000), "Ideal para 2-3 pessoas"),
        ("G (8 fatias)", 4500, Some(5000), "Perfeita para 3-4 pessoas"),
        ("F (8 fatias)", 5500, Some(6500), "Família pequena"),
        ("XF (10 fatias)", 6500, Some(7500), "Família média"),
        ("GG (12 fatias)", 8500, Some(9500), "Família grande"),
        ("Extra (15 fatias)", 14500, Some(15000), "Para grandes grupos"),
    ]
    .into_iter()
    .map(|(name, price, premium, description)| PizzaSize {
        name: name.to_string(),
        price_cents: price,
        premium_price_cents: premium,
        description: description.to_string(),
    })
    .collect()
}

/// Finds a size by its exact name.
pub fn find_size<'a>(sizes: &'a [PizzaSize], name: &str) -> Option<&'a PizzaSize> {
    sizes.iter().find(|s| s.name == name)
}

// =============================================================================
// Price Functions
// =============================================================================

/// Base price × quantity.
pub fn price_simple_item(item: &MenuItem, quantity: i64) -> Money {
    item.base_price().multiply_quantity(quantity)
}

/// Resolves flavor ids against the active catalog, dropping unknown,
/// inactive and non-pizza ids.
fn resolve_flavors<'a>(flavor_ids: &'a [String], catalog: &'a Catalog) -> impl Iterator<Item = &'a MenuItem> + 'a {
    flavor_ids.iter().filter_map(move |id| catalog.active_flavor(id))
}

/// True if any selected flavor is premium.
///
/// Checks both the stored flag and the ingredients themselves, so an item
/// edited outside the catalog is still priced correctly.
pub fn has_premium(flavor_ids: &[String], catalog: &Catalog) -> bool {
    resolve_flavors(flavor_ids, catalog).any(is_premium_flavor)
}

fn is_premium_flavor(flavor: &MenuItem) -> bool {
    flavor.is_premium() || contains_premium(flavor.ingredients())
}

/// Price of one composite pizza. Only flavors that resolve count.
pub fn price_pizza(size: &PizzaSize, flavor_ids: &[String], catalog: &Catalog) -> Money {
    let flavors: Vec<&MenuItem> = resolve_flavors(flavor_ids, catalog).collect();
    price_flavors(size, &flavors)
}

fn price_flavors(size: &PizzaSize, flavors: &[&MenuItem]) -> Money {
    if !flavors.iter().copied().any(is_premium_flavor) {
        return size.price();
    }

    if flavors.len() > 1 {
        size.premium_price() + Money::from_cents(MIXED_PREMIUM_SURCHARGE_CENTS)
    } else {
        size.premium_price()
    }
}

/// Union of the flavors' ingredients, first occurrence wins.
pub fn combined_ingredients<'a>(flavors: impl IntoIterator<Item = &'a MenuItem>) -> Vec<String> {
    let mut all: Vec<String> = Vec::new();
    for flavor in flavors {
        for ingredient in flavor.ingredients() {
            if !all.contains(ingredient) {
                all.push(ingredient.clone());
            }
        }
    }
    all
}

// =============================================================================
// Pizza Builder
// =============================================================================

/// Outcome of [`PizzaBuilder::toggle_flavor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlavorToggle {
    Added,
    Removed,
    /// Selection already holds the maximum; nothing changed.
    CapReached,
}

/// Counter-side state for building one composite pizza.
///
/// ## Builder Flow
/// ```text
/// select_size(G) ──► toggle_flavor(a) ──► toggle_flavor(b) ──► confirm()
///       │                                                          │
///       └── resets flavors                      Some(OrderItem) ◄──┘
///                                               builder reset
/// ```
#[derive(Debug, Clone, Default)]
pub struct PizzaBuilder {
    size: Option<PizzaSize>,
    flavors: Vec<String>,
}

impl PizzaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chooses the size. Any previous flavor selection is cleared.
    pub fn select_size(&mut self, size: PizzaSize) {
        self.size = Some(size);
        self.flavors.clear();
    }

    pub fn size(&self) -> Option<&PizzaSize> {
        self.size.as_ref()
    }

    pub fn flavors(&self) -> &[String] {
        &self.flavors
    }

    /// Adds or removes a flavor. A flavor beyond the cap is ignored.
    pub fn toggle_flavor(&mut self, flavor_id: &str) -> FlavorToggle {
        if let Some(pos) = self.flavors.iter().position(|f| f == flavor_id) {
            self.flavors.remove(pos);
            return FlavorToggle::Removed;
        }

        if self.flavors.len() >= MAX_PIZZA_FLAVORS {
            return FlavorToggle::CapReached;
        }

        self.flavors.push(flavor_id.to_string());
        FlavorToggle::Added
    }

    /// True once a size and at least one flavor are chosen.
    pub fn is_ready(&self) -> bool {
        self.size.is_some() && !self.flavors.is_empty()
    }

    /// Price of the current selection, zero while no size is chosen.
    pub fn current_price(&self, catalog: &Catalog) -> Money {
        match &self.size {
            Some(size) => price_pizza(size, &self.flavors, catalog),
            None => Money::zero(),
        }
    }

    /// True if the current selection triggers the mixed-premium surcharge.
    pub fn has_surcharge(&self, catalog: &Catalog) -> bool {
        let flavors: Vec<&MenuItem> = resolve_flavors(&self.flavors, catalog).collect();
        flavors.len() > 1 && flavors.iter().copied().any(is_premium_flavor)
    }

    /// Turns the selection into an order line and resets the builder.
    ///
    /// Returns `None` and leaves the builder untouched when no size or no
    /// known flavor is selected.
    pub fn confirm(&mut self, catalog: &Catalog) -> Option<OrderItem> {
        if !self.is_ready() {
            return None;
        }
        let size = self.size.as_ref()?;

        let selected: Vec<&MenuItem> = resolve_flavors(&self.flavors, catalog).collect();
        if selected.is_empty() {
            return None;
        }

        let flavor_names = selected
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(" / ");
        let ingredients = combined_ingredients(selected.iter().copied());
        let unit_price = price_flavors(size, &selected);
        let flavor_ids = selected.iter().map(|f| f.id.clone()).collect();

        let item = MenuItem::new(
            format!("pizza-{}", Uuid::new_v4()),
            format!("Pizza {}", flavor_names),
            0,
            category::PIZZA,
        )
        .with_description(Some(format!("Pizza {} - {}", size.name, flavor_names)))
        .with_ingredients(ingredients);

        let line = OrderItem {
            item,
            quantity: 1,
            selected_size: Some(size.name.clone()),
            selected_flavors: Some(flavor_ids),
            note: None,
            unit_price_cents: unit_price.cents(),
        };

        *self = PizzaBuilder::default();
        Some(line)
    }
}
