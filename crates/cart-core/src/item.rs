//! # Line Items
//!
//! Cart line items as the cart store holds them.

use crate::error::CheckoutResult;
use crate::money::Price;
use serde::{Deserialize, Serialize};

/// Landing collection for items that are not filed under a category
pub const UNCATEGORIZED_PATH: &str = "/golden-era-gaming";

/// One product entry in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique key within the cart
    pub slug: String,

    /// Product name
    pub name: String,

    /// Unit price
    pub price: Price,

    /// Quantity (positive)
    pub quantity: u32,

    /// Category slug, empty when uncategorized
    #[serde(default)]
    pub category: String,

    /// Product image URL
    #[serde(default)]
    pub main_image: String,

    /// Units available
    #[serde(default)]
    pub count_in_stock: u32,
}

impl LineItem {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, price: Price, quantity: u32) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            price,
            quantity,
            category: String::new(),
            main_image: String::new(),
            count_in_stock: quantity,
        }
    }

    /// Builder: set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.main_image = url.into();
        self
    }

    /// Builder: set stock count
    pub fn with_stock(mut self, count: u32) -> Self {
        self.count_in_stock = count;
        self
    }

    /// Same item with a different quantity
    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> CheckoutResult<Price> {
        self.price.checked_mul(self.quantity)
    }

    /// Product page link for this item
    pub fn href(&self) -> String {
        if self.category.is_empty() {
            UNCATEGORIZED_PATH.to_string()
        } else {
            format!("/{}/{}", self.category, self.slug)
        }
    }

    /// Quantities offered by the quantity selector; always includes the
    /// current quantity
    pub fn quantity_choices(&self) -> std::ops::RangeInclusive<u32> {
        1..=self.count_in_stock.max(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn cartridge() -> LineItem {
        LineItem::new("zelda", "Zelda", Price::from_cents(1000, Currency::USD), 3)
    }

    #[test]
    fn test_line_item_total() {
        assert_eq!(cartridge().total().unwrap().amount, 3000);
    }

    #[test]
    fn test_href_uses_category() {
        let item = cartridge().with_category("nes");
        assert_eq!(item.href(), "/nes/zelda");
    }

    #[test]
    fn test_href_uncategorized() {
        assert_eq!(cartridge().href(), "/golden-era-gaming");
    }

    #[test]
    fn test_quantity_choices_follow_stock() {
        let item = cartridge().with_stock(4);
        assert_eq!(item.quantity_choices().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(cartridge().with_stock(0).quantity_choices().count(), 3);
    }
}
