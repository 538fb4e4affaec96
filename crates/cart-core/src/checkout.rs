//! # Checkout Adapter
//!
//! Shapes payment-widget callbacks into provider calls: order creation,
//! shipping changes, approval (capture) and error reporting. The adapter owns
//! no cart data; the caller hands it the current line items and options.
//!
//! ```text
//!   Unpaid ──(on_approve: capture ok)──▶ Paid
//! ```
//!
//! There is no way back from `Paid`.

use crate::error::{CheckoutError, CheckoutResult};
use crate::item::LineItem;
use crate::money::Currency;
use crate::order::{shipping_patch, AmountWithBreakdown, CaptureDetails, OrderItem, OrderRequest};
use crate::provider::BoxedOrderActions;
use crate::shipping::{selected_option, ShippingChange, ShippingOption};
use crate::totals::CartTotals;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

/// Local payment state of the screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Unpaid,
    Paid {
        /// Buyer's given name
        info: String,
        /// Provider's id for the captured order
        capture_id: String,
        paid_at: DateTime<Utc>,
    },
}

impl CheckoutState {
    pub fn is_paid(&self) -> bool {
        matches!(self, CheckoutState::Paid { .. })
    }

    /// Buyer's given name once paid, empty before
    pub fn info(&self) -> &str {
        match self {
            CheckoutState::Unpaid => "",
            CheckoutState::Paid { info, .. } => info,
        }
    }

    /// The single Unpaid -> Paid transition
    pub fn mark_paid(&mut self, details: &CaptureDetails) -> CheckoutResult<()> {
        if self.is_paid() {
            return Err(CheckoutError::AlreadyPaid);
        }
        *self = CheckoutState::Paid {
            info: details.payer.name.given_name.clone(),
            capture_id: details.id.clone(),
            paid_at: Utc::now(),
        };
        Ok(())
    }
}

/// Adapter between widget callbacks and the provider's order actions
#[derive(Clone)]
pub struct CheckoutAdapter {
    actions: BoxedOrderActions,
    currency: Currency,
}

impl CheckoutAdapter {
    pub fn new(actions: BoxedOrderActions, currency: Currency) -> Self {
        Self { actions, currency }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Build the order request for the current cart.
    ///
    /// `item_total` is the cart total price and `shipping` the selected
    /// option's amount; the purchase-unit value is their sum.
    pub fn build_order(
        &self,
        items: &[LineItem],
        shipping_options: &[ShippingOption],
    ) -> CheckoutResult<OrderRequest> {
        if items.is_empty() {
            return Err(CheckoutError::InvalidRequest("Cart is empty".to_string()));
        }

        let totals = CartTotals::from_items(items, self.currency)?;
        let shipping = selected_option(shipping_options)?.price()?;
        let amount = AmountWithBreakdown::new(totals.price, shipping)?;

        Ok(OrderRequest::capture(
            items.iter().map(OrderItem::from).collect(),
            amount,
        ))
    }

    /// `createOrder` callback: returns the provider order id
    #[instrument(skip(self, items, shipping_options), fields(items = items.len()))]
    pub async fn create_order(
        &self,
        items: &[LineItem],
        shipping_options: &[ShippingOption],
    ) -> CheckoutResult<String> {
        let request = self.build_order(items, shipping_options)?;
        let order_id = self.actions.create(&request).await?;

        info!(
            "Created {} order {}: {} items",
            self.actions.provider_name(),
            order_id,
            items.len()
        );
        Ok(order_id)
    }

    /// `onShippingChange` callback: patch shipping amount and address
    #[instrument(skip(self, change, items), fields(option = %change.shipping_option.id))]
    pub async fn on_shipping_change(
        &self,
        order_id: &str,
        change: &ShippingChange,
        items: &[LineItem],
    ) -> CheckoutResult<()> {
        let totals = CartTotals::from_items(items, self.currency)?;
        let operations = shipping_patch(change, totals.price)?;
        self.actions.patch(order_id, &operations).await
    }

    /// `onApprove` callback: capture, then flip the state to paid
    #[instrument(skip(self, state))]
    pub async fn on_approve(
        &self,
        order_id: &str,
        state: &mut CheckoutState,
    ) -> CheckoutResult<CaptureDetails> {
        if state.is_paid() {
            return Err(CheckoutError::AlreadyPaid);
        }

        let details = self.actions.capture(order_id).await?;
        if !details.is_completed() {
            warn!("Capture {} finished with status {}", details.id, details.status);
        }

        state.mark_paid(&details)?;
        info!("Order {} captured for {}", order_id, state.info());
        Ok(details)
    }

    /// `onError` callback: log only
    pub fn on_error(&self, err: &CheckoutError) {
        error!("{} checkout error: {}", self.actions.provider_name(), err);
    }
}
