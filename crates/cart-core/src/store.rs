//! # Cart Store
//!
//! The cart store is shared state owned outside the screen. The screen only
//! reads the item list and dispatches intents; it never mutates items itself.
//!
//! `MemoryCartStore` is the in-process store the service runs with.

use crate::error::{CheckoutError, CheckoutResult};
use crate::item::LineItem;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Intents the cart screen dispatches to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum CartAction {
    /// Drop the item with this slug
    #[serde(rename = "CART_REMOVE_ITEM")]
    RemoveItem(LineItem),

    /// Insert the item, or replace the existing entry with the same slug
    #[serde(rename = "CART_ADD_ITEM")]
    AddItem(LineItem),
}

impl CartAction {
    /// Slug of the item this intent targets
    pub fn slug(&self) -> &str {
        match self {
            CartAction::RemoveItem(item) | CartAction::AddItem(item) => &item.slug,
        }
    }
}

/// Read and intent-dispatch access to the cart
pub trait CartStore: Send + Sync {
    /// Snapshot of the current line items, in cart order
    fn items(&self) -> Vec<LineItem>;

    /// Apply an intent
    fn dispatch(&self, action: CartAction) -> CheckoutResult<()>;

    /// Find an item by slug
    fn find(&self, slug: &str) -> Option<LineItem> {
        self.items().into_iter().find(|item| item.slug == slug)
    }
}

/// Shared handle injected into the screen
pub type SharedCartStore = Arc<dyn CartStore>;

#[derive(Debug, Default, Deserialize)]
struct CartSeed {
    #[serde(default)]
    items: Vec<LineItem>,
}

/// In-memory cart store
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    items: RwLock<Vec<LineItem>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with items
    pub fn with_items(items: Vec<LineItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Load seed items from a TOML document with `[[items]]` tables
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let seed: CartSeed = toml::from_str(toml_str)?;
        Ok(Self::with_items(seed.items))
    }

    fn reduce(items: &mut Vec<LineItem>, action: CartAction) -> CheckoutResult<()> {
        match action {
            CartAction::RemoveItem(item) => {
                items.retain(|existing| existing.slug != item.slug);
            }
            CartAction::AddItem(item) => {
                if item.quantity == 0 {
                    return Err(CheckoutError::InvalidRequest(format!(
                        "quantity for {} must be positive",
                        item.slug
                    )));
                }
                match items.iter_mut().find(|existing| existing.slug == item.slug) {
                    Some(existing) => *existing = item,
                    None => items.push(item),
                }
            }
        }
        Ok(())
    }
}

impl CartStore for MemoryCartStore {
    fn items(&self) -> Vec<LineItem> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn dispatch(&self, action: CartAction) -> CheckoutResult<()> {
        debug!("Cart intent: {} {}", action_name(&action), action.slug());
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        Self::reduce(&mut items, action)
    }
}

fn action_name(action: &CartAction) -> &'static str {
    match action {
        CartAction::RemoveItem(_) => "CART_REMOVE_ITEM",
        CartAction::AddItem(_) => "CART_ADD_ITEM",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Price};
    use serde_json::json;

    fn item(slug: &str, quantity: u32) -> LineItem {
        LineItem::new(slug, slug, Price::from_cents(100, Currency::USD), quantity)
    }

    #[test]
    fn test_remove_only_touches_target() {
        let store = MemoryCartStore::with_items(vec![item("a", 1), item("b", 2), item("c", 3)]);

        store.dispatch(CartAction::RemoveItem(item("b", 2))).unwrap();

        let slugs: Vec<_> = store.items().into_iter().map(|i| i.slug).collect();
        assert_eq!(slugs, vec!["a", "c"]);
    }

    #[test]
    fn test_add_replaces_existing_quantity() {
        let store = MemoryCartStore::with_items(vec![item("a", 1)]);

        store.dispatch(CartAction::AddItem(item("a", 4))).unwrap();
        store.dispatch(CartAction::AddItem(item("b", 1))).unwrap();

        assert_eq!(store.find("a").unwrap().quantity, 4);
        assert_eq!(store.items().len(), 2);
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        let store = MemoryCartStore::new();
        assert!(store.dispatch(CartAction::AddItem(item("a", 0))).is_err());
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_from_toml() {
        let store = MemoryCartStore::from_toml(
            r#"
            [[items]]
            slug = "chrono-trigger"
            name = "Chrono Trigger"
            quantity = 1
            category = "snes"
            count_in_stock = 2
            price = { amount = 14999, currency = "USD" }
            "#,
        )
        .unwrap();

        let item = store.find("chrono-trigger").unwrap();
        assert_eq!(item.price.amount, 14999);
        assert_eq!(item.href(), "/snes/chrono-trigger");
        assert!(MemoryCartStore::from_toml("").unwrap().items().is_empty());
    }

    #[test]
    fn test_action_wire_format() {
        let action = CartAction::RemoveItem(item("a", 1));
        let value = serde_json::to_value(&action).unwrap();

        assert_eq!(value["type"], json!("CART_REMOVE_ITEM"));
        assert_eq!(value["payload"]["slug"], json!("a"));
    }
}
