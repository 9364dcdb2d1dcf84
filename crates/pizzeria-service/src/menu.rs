//! # Menu State
//!
//! Shared catalog behind a read-write lock. The counter reads it constantly
//! while the back office edits it rarely.

use std::sync::Arc;

use pizzeria_core::catalog::{Catalog, MenuItem, MenuItemUpdate};
use pizzeria_core::pricing::{price_pizza, PizzaBuilder, PizzaSize};
use pizzeria_core::{Money, OrderItem};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::ServiceResult;

#[derive(Debug, Clone, Default)]
pub struct MenuState {
    catalog: Arc<RwLock<Catalog>>,
}

impl MenuState {
    pub fn new(catalog: Catalog) -> Self {
        MenuState {
            catalog: Arc::new(RwLock::new(catalog)),
        }
    }

    /// Parses a JSON list of menu items. Premium flags are recomputed from
    /// the ingredients; duplicate ids are rejected.
    pub fn from_json(json: &str) -> ServiceResult<Self> {
        let items: Vec<MenuItem> = serde_json::from_str(json)?;
        let catalog = Catalog::from_items(items)?;
        info!(items = catalog.len(), "Menu loaded");
        Ok(Self::new(catalog))
    }

    pub async fn to_json(&self) -> ServiceResult<String> {
        Ok(serde_json::to_string_pretty(self.catalog.read().await.items())?)
    }

    /// A point-in-time copy of the catalog.
    pub async fn snapshot(&self) -> Catalog {
        self.catalog.read().await.clone()
    }

    pub async fn item(&self, id: &str) -> Option<MenuItem> {
        self.catalog.read().await.get(id).cloned()
    }

    pub async fn active_by_category(&self, category: &str) -> Vec<MenuItem> {
        self.catalog
            .read()
            .await
            .by_category(category)
            .cloned()
            .collect()
    }

    pub async fn flavors(&self) -> Vec<MenuItem> {
        self.catalog.read().await.flavors().cloned().collect()
    }

    // =========================================================================
    // Edits
    // =========================================================================

    pub async fn add_item(&self, item: MenuItem) -> ServiceResult<()> {
        let id = item.id.clone();
        self.catalog.write().await.add(item)?;
        info!(item_id = %id, "Menu item added");
        Ok(())
    }

    pub async fn update_item(&self, id: &str, update: MenuItemUpdate) -> ServiceResult<MenuItem> {
        let mut catalog = self.catalog.write().await;
        let item = catalog.update(id, update)?.clone();
        info!(item_id = %id, premium = item.is_premium(), "Menu item updated");
        Ok(item)
    }

    pub async fn remove_item(&self, id: &str) -> ServiceResult<MenuItem> {
        let item = self.catalog.write().await.remove(id)?;
        info!(item_id = %id, "Menu item removed");
        Ok(item)
    }

    pub async fn toggle_active(&self, id: &str) -> ServiceResult<bool> {
        Ok(self.catalog.write().await.toggle_active(id)?)
    }

    pub async fn set_active(&self, id: &str, active: bool) -> ServiceResult<()> {
        Ok(self.catalog.write().await.set_active(id, active)?)
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    pub async fn price_pizza(&self, size: &PizzaSize, flavor_ids: &[String]) -> Money {
        price_pizza(size, flavor_ids, &*self.catalog.read().await)
    }

    /// Confirms a pizza build against the current menu.
    pub async fn confirm_pizza(&self, builder: &mut PizzaBuilder) -> Option<OrderItem> {
        builder.confirm(&*self.catalog.read().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_core::catalog::category;

    #[tokio::test]
    async fn test_from_json_recomputes_premium() {
        let json = r#"[
            {"id": "pizza-sol", "name": "Sol", "basePriceCents": 0, "category": "Pizza Salgada",
             "ingredients": ["Carne de Sol"], "premium": false},
            {"id": "suco", "name": "Suco", "basePriceCents": 800, "category": "Bebida", "active": false}
        ]"#;

        let menu = MenuState::from_json(json).unwrap();
        assert!(menu.item("pizza-sol").await.unwrap().is_premium());
        assert!(menu.active_by_category(category::DRINK).await.is_empty());
    }

    #[tokio::test]
    async fn test_from_json_rejects_duplicates() {
        let json = r#"[
            {"id": "a", "name": "A", "basePriceCents": 100, "category": "Bebida"},
            {"id": "a", "name": "A2", "basePriceCents": 100, "category": "Bebida"}
        ]"#;
        assert!(MenuState::from_json(json).is_err());
    }

    #[tokio::test]
    async fn test_edit_changes_pizza_price() {
        let menu = MenuState::new(Catalog::house_menu());
        let size = PizzaSize::new("G", 4500, Some(5000));
        let flavors = vec!["pizza-frango".to_string(), "pizza-calabresa".to_string()];
        assert_eq!(menu.price_pizza(&size, &flavors).await.cents(), 4500);

        let update = MenuItemUpdate {
            ingredients: Some(vec!["frango".into(), "carne de sol".into()]),
            ..Default::default()
        };
        menu.update_item("pizza-frango", update).await.unwrap();
        assert_eq!(menu.price_pizza(&size, &flavors).await.cents(), 5500);
    }

    #[tokio::test]
    async fn test_round_trip_json() {
        let menu = MenuState::new(Catalog::house_menu());
        let json = menu.to_json().await.unwrap();
        let reloaded = MenuState::from_json(&json).unwrap();
        assert_eq!(reloaded.snapshot().await.items(), menu.snapshot().await.items());
    }

    #[tokio::test]
    async fn test_toggle_hides_flavor() {
        let menu = MenuState::new(Catalog::house_menu());
        let before = menu.flavors().await.len();
        assert!(!menu.toggle_active("pizza-banana").await.unwrap());
        assert_eq!(menu.flavors().await.len(), before - 1);
        assert!(menu.toggle_active("ghost").await.unwrap_err().is_not_found());
    }
}
