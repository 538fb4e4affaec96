//! # Shipping
//!
//! Shipping options, addresses and the rate request the screen sends when it
//! is entered.

use crate::error::{CheckoutError, CheckoutResult};
use crate::money::{Currency, Price};
use crate::order::Money;
use serde::{Deserialize, Serialize};

/// Postal address in the provider's field layout.
///
/// The widget reports partial addresses (often only city, state, postal code
/// and country) under its own field names; missing parts default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Present on addresses coming from the payment widget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default)]
    pub address_line_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    /// State / province
    #[serde(default, alias = "state")]
    pub admin_area_1: String,
    /// City
    #[serde(default, alias = "city", skip_serializing_if = "Option::is_none")]
    pub admin_area_2: Option<String>,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country_code: String,
}

impl ShippingAddress {
    /// Address used for the rate quote when nothing else is configured
    pub fn sample() -> Self {
        Self {
            recipient_name: None,
            address_line_1: "1234 Main St.".to_string(),
            address_line_2: Some("Unit 101".to_string()),
            admin_area_1: "CA".to_string(),
            admin_area_2: Some("San Jose".to_string()),
            postal_code: "95131".to_string(),
            country_code: "US".to_string(),
        }
    }
}

/// A shipping method offered by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOption {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub amount: Money,
    #[serde(default)]
    pub selected: bool,
}

impl ShippingOption {
    /// Option amount as a price
    pub fn price(&self) -> CheckoutResult<Price> {
        self.amount.to_price()
    }
}

/// The one option marked as selected.
///
/// Fails with `NoShippingSelected` when the list is empty or nothing is
/// selected, and with `AmbiguousShippingSelection` when several are.
pub fn selected_option(options: &[ShippingOption]) -> CheckoutResult<&ShippingOption> {
    let mut selected = options.iter().filter(|option| option.selected);
    match (selected.next(), selected.count()) {
        (None, _) => Err(CheckoutError::NoShippingSelected),
        (Some(option), 0) => Ok(option),
        (Some(_), rest) => Err(CheckoutError::AmbiguousShippingSelection { count: rest + 1 }),
    }
}

/// Shipping choice reported by the payment widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingChange {
    pub shipping_option: ShippingOption,
    pub shipping_address: ShippingAddress,
}

/// Amount wrapper inside a rate request purchase unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePurchaseUnit {
    pub amount: Money,
}

/// Body of the shipping-rate quote request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRequest {
    pub shipping_address: ShippingAddress,
    pub purchase_units: Vec<RatePurchaseUnit>,
}

impl RateRequest {
    pub fn new(shipping_address: ShippingAddress, purchase_amount: Price) -> Self {
        Self {
            shipping_address,
            purchase_units: vec![RatePurchaseUnit {
                amount: Money::from_price(&purchase_amount),
            }],
        }
    }
}

impl Default for RateRequest {
    /// Sample address with a USD 100.00 purchase
    fn default() -> Self {
        Self::new(
            ShippingAddress::sample(),
            Price::from_cents(10_000, Currency::USD),
        )
    }
}

/// Rate quote response; `shipping_options` is required
#[derive(Debug, Clone, Deserialize)]
pub struct RateResponse {
    pub shipping_options: Vec<ShippingOption>,
}
