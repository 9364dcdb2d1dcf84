//! # Catalog Module
//!
//! The menu: items, their categories and ingredients, and the edits the
//! back office performs on them.
//!
//! ## Premium Flag
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  An item is premium when any ingredient contains the premium marker     │
//! │  ("carne de sol"), compared case-insensitively.                         │
//! │                                                                         │
//! │  The flag is never set by hand. It is recomputed by every operation     │
//! │  that touches ingredients:                                              │
//! │                                                                         │
//! │    MenuItem::new / with_ingredients / set_ingredients                   │
//! │    add_ingredient / remove_ingredient                                   │
//! │    Catalog::update (ingredient patch)                                   │
//! │    deserialization from catalog input                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_menu_text, validate_price_cents};
use crate::PREMIUM_INGREDIENT_MARKER;

/// Category names used by the house menu.
pub mod category {
    pub const SAVORY_PIZZA: &str = "Pizza Salgada";
    pub const SWEET_PIZZA: &str = "Pizza Doce";
    pub const DRINK: &str = "Bebida";
    pub const PASTRY: &str = "Pastel";
    pub const APPETIZER: &str = "Tira Gosto";
    /// Category of composite pizzas produced by the pizza builder.
    pub const PIZZA: &str = "Pizza";

    /// True for categories whose items can be chosen as pizza flavors.
    pub fn is_flavor(category: &str) -> bool {
        category == SAVORY_PIZZA || category == SWEET_PIZZA
    }
}

/// Case-insensitive premium marker check on a single ingredient.
pub fn is_premium_ingredient(ingredient: &str) -> bool {
    ingredient.to_lowercase().contains(PREMIUM_INGREDIENT_MARKER)
}

/// True if any ingredient carries the premium marker.
pub fn contains_premium(ingredients: &[String]) -> bool {
    ingredients.iter().any(|i| is_premium_ingredient(i))
}

// =============================================================================
// Menu Item
// =============================================================================

/// A product on the menu.
///
/// `ingredients` and `premium` are private so the premium flag cannot drift
/// from the ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[serde(from = "MenuItemRecord")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub base_price_cents: i64,
    pub category: String,
    pub description: Option<String>,
    ingredients: Vec<String>,
    pub active: bool,
    premium: bool,
}

/// Catalog input shape: a menu item without the derived flag.
///
/// Incoming `premium` values are ignored; the flag is recomputed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRecord {
    pub id: String,
    pub name: String,
    pub base_price_cents: i64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<MenuItemRecord> for MenuItem {
    fn from(record: MenuItemRecord) -> Self {
        MenuItem::new(
            record.id,
            record.name,
            record.base_price_cents,
            record.category,
        )
        .with_description(record.description)
        .with_ingredients(record.ingredients)
        .with_active(record.active)
    }
}

impl MenuItem {
    /// Creates an active item with no ingredients.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        base_price_cents: i64,
        category: impl Into<String>,
    ) -> Self {
        MenuItem {
            id: id.into(),
            name: name.into(),
            base_price_cents,
            category: category.into(),
            description: None,
            ingredients: Vec::new(),
            active: true,
            premium: false,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_ingredients(ingredients.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[inline]
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    /// Derived from the ingredients, see the module docs.
    #[inline]
    pub fn is_premium(&self) -> bool {
        self.premium
    }

    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }

    /// True if this item can be chosen as a pizza flavor.
    pub fn is_flavor(&self) -> bool {
        category::is_flavor(&self.category)
    }

    pub fn set_ingredients(&mut self, ingredients: Vec<String>) {
        self.ingredients = ingredients;
        self.premium = contains_premium(&self.ingredients);
    }

    pub fn add_ingredient(&mut self, ingredient: impl Into<String>) {
        self.ingredients.push(ingredient.into());
        self.premium = contains_premium(&self.ingredients);
    }

    /// Removes the ingredient at `index`. Returns it if it existed.
    pub fn remove_ingredient(&mut self, index: usize) -> Option<String> {
        if index >= self.ingredients.len() {
            return None;
        }
        let removed = self.ingredients.remove(index);
        self.premium = contains_premium(&self.ingredients);
        Some(removed)
    }
}

// =============================================================================
// Menu Item Update
// =============================================================================

/// Partial edit of a menu item. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub base_price_cents: Option<i64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub active: Option<bool>,
}

// =============================================================================
// Catalog
// =============================================================================

/// The menu, in insertion order.
///
/// Serialises as a plain list of items. Deserialising goes through
/// [`Catalog::from_items`], so duplicate ids are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<MenuItem>", into = "Vec<MenuItem>")]
pub struct Catalog {
    items: Vec<MenuItem>,
}

impl TryFrom<Vec<MenuItem>> for Catalog {
    type Error = CoreError;

    fn try_from(items: Vec<MenuItem>) -> CoreResult<Self> {
        Catalog::from_items(items)
    }
}

impl From<Catalog> for Vec<MenuItem> {
    fn from(catalog: Catalog) -> Self {
        catalog.items
    }
}

impl Catalog {
    pub fn new() -> Self {
        Catalog { items: Vec::new() }
    }

    /// Builds a catalog from a list of items. Later duplicates of an id
    /// are rejected.
    pub fn from_items(items: impl IntoIterator<Item = MenuItem>) -> CoreResult<Self> {
        let mut catalog = Catalog::new();
        for item in items {
            catalog.add(item)?;
        }
        Ok(catalog)
    }

    /// Adds an item to the end of the menu.
    pub fn add(&mut self, item: MenuItem) -> CoreResult<()> {
        validate_menu_text("id", &item.id)?;
        validate_menu_text("name", &item.name)?;
        validate_price_cents(item.base_price_cents)?;

        if self.get(&item.id).is_some() {
            return Err(CoreError::DuplicateMenuItem(item.id));
        }

        self.items.push(item);
        Ok(())
    }

    /// Applies a partial edit and returns the updated item.
    pub fn update(&mut self, id: &str, update: MenuItemUpdate) -> CoreResult<&MenuItem> {
        if let Some(name) = &update.name {
            validate_menu_text("name", name)?;
        }
        if let Some(price) = update.base_price_cents {
            validate_price_cents(price)?;
        }

        let item = self.get_mut(id)?;
        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(price) = update.base_price_cents {
            item.base_price_cents = price;
        }
        if let Some(category) = update.category {
            item.category = category;
        }
        if let Some(description) = update.description {
            item.description = Some(description);
        }
        if let Some(ingredients) = update.ingredients {
            item.set_ingredients(ingredients);
        }
        if let Some(active) = update.active {
            item.active = active;
        }
        Ok(item)
    }

    /// Removes an item from the menu.
    pub fn remove(&mut self, id: &str) -> CoreResult<MenuItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CoreError::MenuItemNotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> CoreResult<()> {
        self.get_mut(id)?.active = active;
        Ok(())
    }

    /// Flips the active flag and returns the new value.
    pub fn toggle_active(&mut self, id: &str) -> CoreResult<bool> {
        let item = self.get_mut(id)?;
        item.active = !item.active;
        Ok(item.active)
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Mutable access for ingredient edits.
    pub fn get_mut(&mut self, id: &str) -> CoreResult<&mut MenuItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::MenuItemNotFound(id.to_string()))
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn active_items(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(|i| i.active)
    }

    /// Active items of one category.
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a MenuItem> + 'a {
        self.active_items().filter(move |i| i.category == category)
    }

    /// Active items that can be chosen as pizza flavors.
    pub fn flavors(&self) -> impl Iterator<Item = &MenuItem> {
        self.active_items().filter(|i| i.is_flavor())
    }

    /// Looks up an active pizza flavor by id. Drinks, pastries and
    /// inactive items resolve to `None`.
    pub fn active_flavor(&self, id: &str) -> Option<&MenuItem> {
        self.get(id).filter(|i| i.active && i.is_flavor())
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category.as_str()) {
                seen.push(&item.category);
            }
        }
        seen
    }

    /// The restaurant's standard menu.
    pub fn house_menu() -> Self {
        let mut items = Vec::new();

        for (id, name, ingredients) in SAVORY_PIZZAS {
            items.push(
                MenuItem::new(*id, *name, 0, category::SAVORY_PIZZA)
                    .with_ingredients(ingredients.iter().copied()),
            );
        }
        for (id, name, ingredients) in SWEET_PIZZAS {
            items.push(
                MenuItem::new(*id, *name, 0, category::SWEET_PIZZA)
                    .with_ingredients(ingredients.iter().copied()),
            );
        }
        for (id, name, cat, price, ingredients) in PRICED_ITEMS {
            items.push(
                MenuItem::new(*id, *name, *price, *cat)
                    .with_ingredients(ingredients.iter().copied()),
            );
        }

        Catalog { items }
    }
}

type FlavorRow = (&'static str, &'static str, &'static [&'static str]);
type PricedRow = (
    &'static str,
    &'static str,
    &'static str,
    i64,
    &'static [&'static str],
);

const SAVORY_PIZZAS: &[FlavorRow] = &[
    ("pizza-mexicana", "Mexicana", &["molho", "mussarela", "pimentão", "pimenta calabresa", "tomate", "cebola", "orégano"]),
    ("pizza-seis-coberturas", "Seis Coberturas", &["molho", "mussarela", "presunto", "frango", "milho", "tomate", "orégano"]),
    ("pizza-nordestina", "Nordestina", &["molho", "mussarela", "carne de sol", "cebola roxa", "cheiro verde", "pimenta calabresa", "orégano"]),
    ("pizza-mussarela", "Mussarela", &["molho", "mussarela", "tomate", "azeitona", "orégano"]),
    ("pizza-calabresa", "Calabresa", &["molho", "mussarela", "calabresa", "tomate", "cebola", "orégano"]),
    ("pizza-vegetariana", "Vegetariana", &["molho", "mussarela", "tomate", "cebola", "pimentão", "milho", "batata palha", "azeitona", "orégano"]),
    ("pizza-frango", "Frango", &["molho", "mussarela", "frango", "tomate", "cebola", "orégano"]),
    ("pizza-bacon-milho", "Bacon com Milho", &["molho", "mussarela", "bacon", "milho", "tomate", "cebola", "orégano"]),
    ("pizza-portuguesa", "Portuguesa", &["molho", "mussarela", "presunto", "tomate", "cebola", "milho", "ovo", "catupiry", "azeitona", "orégano"]),
    ("pizza-mista", "Mista", &["molho", "mussarela", "presunto", "frango", "calabresa", "milho", "azeitona", "orégano"]),
    ("pizza-frango-catupiry", "Frango com Catupiry", &["molho", "mussarela", "frango", "catupiry", "orégano"]),
    ("pizza-carne-sol", "Carne de Sol", &["molho", "mussarela", "carne de sol", "tomate", "cebola", "orégano"]),
];

const SWEET_PIZZAS: &[FlavorRow] = &[
    ("pizza-abacaxi", "Abacaxi", &["mussarela", "abacaxi", "leite condensado"]),
    ("pizza-banana", "Banana", &["mussarela", "banana", "canela", "leite condensado"]),
    ("pizza-chocolate", "Chocolate", &["mussarela", "chocolate", "leite condensado"]),
    ("pizza-coco", "Pizza de Coco", &["mussarela", "coco ralado", "chocolate"]),
];

const PRICED_ITEMS: &[PricedRow] = &[
    ("suco-laranja", "Suco Natural de Laranja", category::DRINK, 800, &["laranja natural"]),
    ("suco-maracuja", "Suco Natural de Maracujá", category::DRINK, 800, &["maracujá natural"]),
    ("refrigerante-2l", "Refrigerante 2L", category::DRINK, 1500, &[]),
    ("refrigerante-1l", "Refrigerante 1L", category::DRINK, 800, &[]),
    ("refrigerante-lata", "Refrigerante Lata", category::DRINK, 500, &[]),
    ("pastel-frango", "Pastel de Frango", category::PASTRY, 600, &["massa de pastel", "frango", "temperos"]),
    ("pastel-queijo", "Pastel de Queijo", category::PASTRY, 600, &["massa de pastel", "queijo mussarela"]),
    ("pastel-carne", "Pastel de Carne", category::PASTRY, 900, &["massa de pastel", "carne moída", "cebola", "temperos"]),
    ("batata-frita", "Batata Frita", category::APPETIZER, 1500, &["batata", "óleo", "sal"]),
    ("ovo-codorna", "Ovo de Codorna", category::APPETIZER, 1000, &["ovos de codorna", "temperos"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_is_case_insensitive_substring() {
        let item = MenuItem::new("x", "X", 0, category::SAVORY_PIZZA)
            .with_ingredients(["molho", "Carne de Sol desfiada"]);
        assert!(item.is_premium());

        let plain = MenuItem::new("y", "Y", 0, category::SAVORY_PIZZA).with_ingredients(["molho"]);
        assert!(!plain.is_premium());
    }

    #[test]
    fn test_premium_recomputed_on_ingredient_edits() {
        let mut item = MenuItem::new("x", "X", 0, category::SAVORY_PIZZA).with_ingredients(["molho"]);
        item.add_ingredient("CARNE DE SOL");
        assert!(item.is_premium());

        assert_eq!(item.remove_ingredient(1).as_deref(), Some("CARNE DE SOL"));
        assert!(!item.is_premium());
        assert_eq!(item.remove_ingredient(5), None);
    }

    #[test]
    fn test_update_recomputes_premium() {
        let mut catalog = Catalog::house_menu();
        assert!(!catalog.get("pizza-calabresa").unwrap().is_premium());

        let update = MenuItemUpdate {
            ingredients: Some(vec!["molho".into(), "carne de sol".into()]),
            ..Default::default()
        };
        let updated = catalog.update("pizza-calabresa", update).unwrap();
        assert!(updated.is_premium());
    }

    #[test]
    fn test_deserialize_ignores_incoming_premium_flag() {
        let json = r#"{
            "id": "pizza-sol",
            "name": "Sol",
            "basePriceCents": 0,
            "category": "Pizza Salgada",
            "ingredients": ["carne de sol"],
            "premium": false
        }"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert!(item.is_premium());
        assert!(item.active);
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut catalog = Catalog::house_menu();
        let dup = MenuItem::new("pizza-frango", "Frango 2", 0, category::SAVORY_PIZZA);
        assert!(matches!(catalog.add(dup), Err(CoreError::DuplicateMenuItem(_))));
    }

    #[test]
    fn test_by_category_skips_inactive() {
        let mut catalog = Catalog::house_menu();
        let drinks_before = catalog.by_category(category::DRINK).count();

        assert!(!catalog.toggle_active("refrigerante-lata").unwrap());
        assert_eq!(catalog.by_category(category::DRINK).count(), drinks_before - 1);
        assert!(catalog.get("refrigerante-lata").is_some());
    }

    #[test]
    fn test_flavors_are_active_pizzas() {
        let mut catalog = Catalog::house_menu();
        let total = catalog.flavors().count();
        assert_eq!(total, SAVORY_PIZZAS.len() + SWEET_PIZZAS.len());

        catalog.set_active("pizza-coco", false).unwrap();
        assert_eq!(catalog.flavors().count(), total - 1);
        assert!(catalog.active_flavor("pizza-coco").is_none());
        assert!(catalog.active_flavor("pastel-carne").is_none());
        assert!(catalog.active_flavor("pizza-chocolate").is_some());
    }

    #[test]
    fn test_catalog_json_is_an_item_list() {
        let catalog = Catalog::house_menu();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.starts_with('['));

        let reloaded: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded.items(), catalog.items());

        let duplicated = r#"[
            {"id": "a", "name": "A", "basePriceCents": 100, "category": "Bebida"},
            {"id": "a", "name": "A2", "basePriceCents": 100, "category": "Bebida"}
        ]"#;
        assert!(serde_json::from_str::<Catalog>(duplicated).is_err());
    }

    #[test]
    fn test_remove_missing_item() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.remove("nope"),
            Err(CoreError::MenuItemNotFound(_))
        ));
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let catalog = Catalog::house_menu();
        assert_eq!(
            catalog.categories(),
            vec![
                category::SAVORY_PIZZA,
                category::SWEET_PIZZA,
                category::DRINK,
                category::PASTRY,
                category::APPETIZER
            ]
        );
    }
}
