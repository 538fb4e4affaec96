//! # Cart View
//!
//! Display model for the cart screen. Renderers (HTML page, JSON endpoint)
//! consume this instead of reading the store directly.

use crate::item::LineItem;
use crate::shipping::ShippingOption;
use crate::store::CartAction;
use crate::totals::CartTotals;
use serde::Serialize;

pub const EMPTY_CART_MESSAGE: &str = "Cart is empty.";

/// One table row
#[derive(Debug, Clone, Serialize)]
pub struct CartRow {
    pub slug: String,
    pub name: String,
    pub href: String,
    pub image: String,
    pub quantity: u32,
    /// Options for the quantity selector
    pub quantity_choices: Vec<u32>,
    /// The selector is rendered but does not accept input
    pub quantity_editable: bool,
    pub price: String,
    /// Intent sent by the remove control
    pub remove: CartAction,
}

impl From<&LineItem> for CartRow {
    fn from(item: &LineItem) -> Self {
        Self {
            slug: item.slug.clone(),
            name: item.name.clone(),
            href: item.href(),
            image: item.main_image.clone(),
            quantity: item.quantity,
            quantity_choices: item.quantity_choices().collect(),
            quantity_editable: false,
            price: item.price.display(),
            remove: CartAction::RemoveItem(item.clone()),
        }
    }
}

/// What the payment slot of the summary panel shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentPanel {
    /// Order is paid; widget removed
    Hidden,
    /// Widget script still loading
    Loading,
    /// Widget script failed to load
    Unavailable,
    /// Payment buttons
    Buttons {
        client_id: String,
        currency: String,
        shipping_options: Vec<ShippingOption>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct CartSummary {
    pub total_quantity: u32,
    pub total_price: String,
    pub payment: PaymentPanel,
}

impl CartSummary {
    /// "Total (3) : $25.00"
    pub fn label(&self) -> String {
        format!("Total ({}) : {}", self.total_quantity, self.total_price)
    }
}

/// Whole screen
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CartView {
    Empty { message: String },
    Filled { rows: Vec<CartRow>, summary: CartSummary },
}

impl CartView {
    pub fn new(items: &[LineItem], totals: CartTotals, payment: PaymentPanel) -> Self {
        if items.is_empty() {
            return CartView::Empty {
                message: EMPTY_CART_MESSAGE.to_string(),
            };
        }

        CartView::Filled {
            rows: items.iter().map(CartRow::from).collect(),
            summary: CartSummary {
                total_quantity: totals.quantity,
                total_price: totals.price.display(),
                payment,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CartView::Empty { .. })
    }

    pub fn rows(&self) -> &[CartRow] {
        match self {
            CartView::Empty { .. } => &[],
            CartView::Filled { rows, .. } => rows,
        }
    }

    pub fn summary(&self) -> Option<&CartSummary> {
        match self {
            CartView::Empty { .. } => None,
            CartView::Filled { summary, .. } => Some(summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Price};

    fn items() -> Vec<LineItem> {
        vec![
            LineItem::new("a", "A", Price::from_cents(1000, Currency::USD), 2).with_category("snes"),
            LineItem::new("b", "B", Price::from_cents(500, Currency::USD), 1).with_stock(3),
        ]
    }

    #[test]
    fn test_empty_cart_has_no_table_or_widget() {
        let view = CartView::new(&[], CartTotals::from_items(&[], Currency::USD).unwrap(), PaymentPanel::Loading);

        assert!(view.is_empty());
        assert!(view.rows().is_empty());
        assert!(view.summary().is_none());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["message"], "Cart is empty.");
    }

    #[test]
    fn test_filled_cart() {
        let items = items();
        let totals = CartTotals::from_items(&items, Currency::USD).unwrap();
        let view = CartView::new(&items, totals, PaymentPanel::Hidden);

        assert_eq!(view.rows().len(), 2);
        assert_eq!(view.rows()[0].href, "/snes/a");
        assert_eq!(view.rows()[0].price, "$10.00");
        assert!(!view.rows()[1].quantity_editable);
        assert_eq!(view.rows()[1].quantity_choices, vec![1, 2, 3]);
        assert_eq!(view.summary().unwrap().label(), "Total (3) : $25.00");
    }
}
