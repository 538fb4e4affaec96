//! # Cart Screen
//!
//! Wires the cart store, rate source, checkout adapter and navigator into
//! the cart screen's lifecycle:
//!
//! - `enter` runs once per visit: marks the widget script pending and
//!   fetches shipping rates. A visit whose fetch failed retries it on the
//!   next `enter`; `remount` always starts a fresh visit.
//! - the Unpaid -> Paid transition navigates away exactly once, clears the
//!   local order-item mirror and ends the visit.

use crate::checkout::{CheckoutAdapter, CheckoutState};
use crate::error::{CheckoutError, CheckoutResult};
use crate::item::LineItem;
use crate::money::Currency;
use crate::order::OrderItem;
use crate::provider::{BoxedOrderActions, BoxedRateSource, NavigationTarget, Navigator};
use crate::shipping::{RateRequest, ShippingChange, ShippingOption};
use crate::store::{CartAction, SharedCartStore};
use crate::totals::CartTotals;
use crate::view::{CartView, PaymentPanel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Loading status of the payment widget script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStatus {
    #[default]
    Initial,
    Pending,
    Resolved,
    Rejected,
}

/// Static settings of the screen
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Public client id handed to the widget script
    pub client_id: String,
    pub currency: Currency,
    /// Body of the rate quote sent on entry
    pub rate_request: RateRequest,
}

impl ScreenConfig {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            currency: Currency::USD,
            rate_request: RateRequest::default(),
        }
    }

    /// Builder: replace the rate request
    pub fn with_rate_request(mut self, request: RateRequest) -> Self {
        self.rate_request = request;
        self
    }
}

pub struct CartScreen {
    config: ScreenConfig,
    store: SharedCartStore,
    checkout: CheckoutAdapter,
    rates: BoxedRateSource,
    navigator: Arc<dyn Navigator>,

    entered: bool,
    rates_loaded: bool,
    script_status: ScriptStatus,
    shipping_options: Vec<ShippingOption>,
    state: CheckoutState,
    order_items: Vec<OrderItem>,
    navigated: bool,
}

impl CartScreen {
    pub fn new(
        config: ScreenConfig,
        store: SharedCartStore,
        actions: BoxedOrderActions,
        rates: BoxedRateSource,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let checkout = CheckoutAdapter::new(actions, config.currency);
        Self {
            config,
            store,
            checkout,
            rates,
            navigator,
            entered: false,
            rates_loaded: false,
            script_status: ScriptStatus::Initial,
            shipping_options: Vec::new(),
            state: CheckoutState::Unpaid,
            order_items: Vec::new(),
            navigated: false,
        }
    }

    /// Start a visit. While the current visit is open this only retries a
    /// rate fetch that failed.
    #[instrument(skip(self))]
    pub async fn enter(&mut self) {
        if !self.entered {
            self.reset();
            self.entered = true;
            self.script_status = ScriptStatus::Pending;
        } else if self.rates_loaded {
            return;
        }

        match self.rates.fetch_rates(&self.config.rate_request).await {
            Ok(options) => {
                info!("Loaded {} shipping options", options.len());
                self.shipping_options = options;
                self.rates_loaded = true;
            }
            Err(e) => {
                warn!("Shipping rate fetch failed: {}", e);
            }
        }
    }

    /// End the visit; the next `enter` starts from scratch.
    pub fn leave(&mut self) {
        self.entered = false;
    }

    /// Page load: close whatever visit is open and start a new one
    pub async fn remount(&mut self) {
        self.leave();
        self.enter().await;
    }

    fn reset(&mut self) {
        self.script_status = ScriptStatus::Initial;
        self.rates_loaded = false;
        self.shipping_options.clear();
        self.state = CheckoutState::Unpaid;
        self.order_items.clear();
        self.navigated = false;
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    pub fn set_script_status(&mut self, status: ScriptStatus) {
        self.script_status = status;
    }

    pub fn script_status(&self) -> ScriptStatus {
        self.script_status
    }

    pub fn shipping_options(&self) -> &[ShippingOption] {
        &self.shipping_options
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Items sent with the last order, until payment clears them
    pub fn order_items(&self) -> &[OrderItem] {
        &self.order_items
    }

    pub fn items(&self) -> Vec<LineItem> {
        self.store.items()
    }

    pub fn totals(&self) -> CheckoutResult<CartTotals> {
        CartTotals::from_items(&self.items(), self.config.currency)
    }

    /// Remove control: one remove intent for exactly this item
    pub fn remove_item(&self, slug: &str) -> CheckoutResult<()> {
        let item = self.find(slug)?;
        self.store.dispatch(CartAction::RemoveItem(item))
    }

    /// Quantity selector: re-add the item with the new quantity
    pub fn update_quantity(&self, slug: &str, quantity: u32) -> CheckoutResult<()> {
        let item = self.find(slug)?;
        self.store.dispatch(CartAction::AddItem(item.with_quantity(quantity)))
    }

    fn find(&self, slug: &str) -> CheckoutResult<LineItem> {
        self.store.find(slug).ok_or_else(|| CheckoutError::ItemNotFound {
            slug: slug.to_string(),
        })
    }

    /// `createOrder` from the widget
    pub async fn create_order(&mut self) -> CheckoutResult<String> {
        if self.state.is_paid() {
            return Err(CheckoutError::AlreadyPaid);
        }
        let items = self.items();
        let order_id = self
            .checkout
            .create_order(&items, &self.shipping_options)
            .await?;
        self.order_items = items.iter().map(OrderItem::from).collect();
        Ok(order_id)
    }

    /// `onShippingChange` from the widget
    pub async fn shipping_change(&self, order_id: &str, change: &ShippingChange) -> CheckoutResult<()> {
        self.checkout
            .on_shipping_change(order_id, change, &self.items())
            .await
    }

    /// `onApprove` from the widget. Returns where the buyer was sent.
    pub async fn approve(&mut self, order_id: &str) -> CheckoutResult<NavigationTarget> {
        self.checkout.on_approve(order_id, &mut self.state).await?;
        self.after_paid()
            .ok_or_else(|| CheckoutError::Internal("paid screen already navigated".to_string()))
    }

    /// `onError` from the widget
    pub fn report_error(&self, err: &CheckoutError) {
        self.checkout.on_error(err);
    }

    fn after_paid(&mut self) -> Option<NavigationTarget> {
        if !self.state.is_paid() || self.navigated {
            return None;
        }
        self.navigated = true;
        self.order_items.clear();

        let target = NavigationTarget::home_with_message(self.state.info());
        self.navigator.navigate(&target);
        self.leave();
        Some(target)
    }

    fn payment_panel(&self) -> PaymentPanel {
        if self.state.is_paid() {
            return PaymentPanel::Hidden;
        }
        match self.script_status {
            ScriptStatus::Initial | ScriptStatus::Pending => PaymentPanel::Loading,
            ScriptStatus::Rejected => PaymentPanel::Unavailable,
            ScriptStatus::Resolved => PaymentPanel::Buttons {
                client_id: self.config.client_id.clone(),
                currency: self.config.currency.as_str().to_string(),
                shipping_options: self.shipping_options.clone(),
            },
        }
    }

    /// Build the display model from the current store contents
    pub fn view(&self) -> CheckoutResult<CartView> {
        let items = self.items();
        let totals = CartTotals::from_items(&items, self.config.currency)?;
        Ok(CartView::new(&items, totals, self.payment_panel()))
    }
}
