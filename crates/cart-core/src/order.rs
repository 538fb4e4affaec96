//! # Order Payloads
//!
//! Request and response bodies exchanged with the payment provider's order
//! API: order creation, shipping patches and capture.

use crate::error::CheckoutResult;
use crate::item::LineItem;
use crate::money::{Currency, Price};
use crate::shipping::{ShippingAddress, ShippingChange};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Reference id the provider gives a single purchase unit
pub const DEFAULT_REFERENCE_ID: &str = "default";

/// Currency code + decimal string, as the provider represents amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub currency_code: String,
    pub value: String,
}

impl Money {
    pub fn new(currency: Currency, value: impl Into<String>) -> Self {
        Self {
            currency_code: currency.as_str().to_string(),
            value: value.into(),
        }
    }

    pub fn from_price(price: &Price) -> Self {
        Self::new(price.currency, price.to_decimal_string())
    }

    /// Parse back into minor units
    pub fn to_price(&self) -> CheckoutResult<Price> {
        let currency = Currency::from_code(&self.currency_code)?;
        Price::parse_decimal(&self.value, currency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderIntent {
    Capture,
    Authorize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShippingPreference {
    /// Use the buyer's address on file with the provider
    GetFromFile,
    NoShipping,
    SetProvidedAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationContext {
    pub shipping_preference: ShippingPreference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub item_total: Money,
    pub shipping: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountWithBreakdown {
    pub currency_code: String,
    pub value: String,
    pub breakdown: Breakdown,
}

impl AmountWithBreakdown {
    /// Amount whose value is item total plus shipping
    pub fn new(item_total: Price, shipping: Price) -> CheckoutResult<Self> {
        let value = item_total.checked_add(&shipping)?;
        Ok(Self {
            currency_code: value.currency.as_str().to_string(),
            value: value.to_decimal_string(),
            breakdown: Breakdown {
                item_total: Money::from_price(&item_total),
                shipping: Money::from_price(&shipping),
            },
        })
    }
}

/// Flattened line item in a purchase unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub unit_amount: Money,
    /// The provider takes quantities as strings
    pub quantity: String,
}

impl From<&LineItem> for OrderItem {
    fn from(item: &LineItem) -> Self {
        Self {
            name: item.name.clone(),
            unit_amount: Money::from_price(&item.price),
            quantity: item.quantity.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    pub amount: AmountWithBreakdown,
    pub items: Vec<OrderItem>,
}

/// Body of an order creation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub intent: OrderIntent,
    pub purchase_units: Vec<PurchaseUnit>,
    pub application_context: ApplicationContext,
}

impl OrderRequest {
    /// Single purchase unit, captured immediately, shipping from the
    /// buyer's provider profile
    pub fn capture(items: Vec<OrderItem>, amount: AmountWithBreakdown) -> Self {
        Self {
            intent: OrderIntent::Capture,
            purchase_units: vec![PurchaseUnit { amount, items }],
            application_context: ApplicationContext {
                shipping_preference: ShippingPreference::GetFromFile,
            },
        }
    }

    /// The (only) purchase unit
    pub fn purchase_unit(&self) -> Option<&PurchaseUnit> {
        self.purchase_units.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
}

/// One JSON-Patch operation against an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl PatchOperation {
    fn replace(field: &str, value: serde_json::Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: format!(
                "/purchase_units/@reference_id=='{}'/{}",
                DEFAULT_REFERENCE_ID, field
            ),
            value: Some(value),
        }
    }
}

/// Patch that moves an in-flight order to the shipping option and address
/// the buyer picked in the widget.
pub fn shipping_patch(change: &ShippingChange, item_total: Price) -> CheckoutResult<Vec<PatchOperation>> {
    let shipping = change.shipping_option.price()?;
    let amount = AmountWithBreakdown::new(item_total, shipping)?;
    let address = &change.shipping_address;

    let mut ops = vec![PatchOperation::replace(
        "amount",
        serde_json::to_value(&amount)?,
    )];

    if let Some(name) = &address.recipient_name {
        ops.push(PatchOperation::replace(
            "shipping/name",
            json!({ "full_name": name }),
        ));
    }

    ops.push(PatchOperation::replace(
        "shipping/address",
        patch_address(address),
    ));

    Ok(ops)
}

fn patch_address(address: &ShippingAddress) -> serde_json::Value {
    json!({
        "address_line_1": address.address_line_1,
        "address_line_2": address.address_line_2.clone().unwrap_or_default(),
        "admin_area_1": address.admin_area_1,
        "admin_area_2": address.admin_area_2.clone().unwrap_or_default(),
        "postal_code": address.postal_code,
        "country_code": address.country_code,
    })
}

/// Response to order creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerName {
    pub given_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub name: PayerName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,
}

/// Response to capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDetails {
    pub id: String,
    pub status: String,
    pub payer: Payer,
}

impl CaptureDetails {
    /// Whether the provider reports the funds as transferred
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("COMPLETED")
    }
}

/// Provider error body
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ProviderErrorBody {
    pub fn summary(&self) -> Option<String> {
        match (&self.name, &self.message, &self.error_description) {
            (Some(name), Some(message), _) => Some(format!("{}: {}", name, message)),
            (_, Some(message), _) => Some(message.clone()),
            (_, _, Some(description)) => Some(description.clone()),
            (Some(name), None, None) => Some(name.clone()),
            (None, None, None) => None,
        }
    }
}
