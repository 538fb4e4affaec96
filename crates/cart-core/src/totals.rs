//! # Cart Totals
//!
//! Aggregate quantity and price over the current line items.

use crate::error::{CheckoutError, CheckoutResult};
use crate::item::LineItem;
use crate::money::{Currency, Price};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Sum of quantities
    pub quantity: u32,
    /// Sum of quantity x unit price
    pub price: Price,
}

impl CartTotals {
    /// Compute totals for a list of line items.
    ///
    /// An empty list yields zero in `currency`; otherwise every item must
    /// share that currency.
    pub fn from_items(items: &[LineItem], currency: Currency) -> CheckoutResult<Self> {
        let mut quantity: u32 = 0;
        let mut price = Price::zero(currency);

        for item in items {
            quantity = quantity.checked_add(item.quantity).ok_or_else(|| {
                CheckoutError::InvalidRequest("total quantity overflows".to_string())
            })?;
            price = price.checked_add(&item.total()?)?;
        }

        Ok(Self { quantity, price })
    }
}
