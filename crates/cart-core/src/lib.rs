//! # cart-core
//!
//! Core types and traits for the cart screen.
//!
//! This crate provides:
//! - `CartStore` and `CartAction` for reading and mutating the shared cart
//! - `CartTotals` for aggregate quantity and price
//! - `OrderActions` and `ShippingRateSource` for the payment provider
//! - `CheckoutAdapter` and `CheckoutState` for the widget callbacks
//! - `CartScreen` and `CartView` for the screen itself
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{CartScreen, MemoryCartStore, ScreenConfig};
//!
//! let mut screen = CartScreen::new(
//!     ScreenConfig::new(client_id),
//!     Arc::new(MemoryCartStore::new()),
//!     orders,
//!     rates,
//!     navigator,
//! );
//!
//! // Fetch shipping rates for this visit
//! screen.enter().await;
//!
//! // Widget callbacks
//! let order_id = screen.create_order().await?;
//! let target = screen.approve(&order_id).await?;
//! ```

pub mod checkout;
pub mod error;
pub mod item;
pub mod money;
pub mod order;
pub mod provider;
pub mod screen;
pub mod shipping;
pub mod store;
pub mod totals;
pub mod view;

// Re-exports for convenience
pub use checkout::{CheckoutAdapter, CheckoutState};
pub use error::{CheckoutError, CheckoutResult};
pub use item::LineItem;
pub use money::{Currency, Price};
pub use order::{
    CaptureDetails, CreatedOrder, Money, OrderItem, OrderRequest, PatchOperation,
    ProviderErrorBody,
};
pub use provider::{
    BoxedOrderActions, BoxedRateSource, LoggingNavigator, NavigationTarget, Navigator,
    OrderActions, RecordingNavigator, ShippingRateSource,
};
pub use screen::{CartScreen, ScreenConfig, ScriptStatus};
pub use shipping::{
    selected_option, RateRequest, RateResponse, ShippingAddress, ShippingChange, ShippingOption,
};
pub use store::{CartAction, CartStore, MemoryCartStore, SharedCartStore};
pub use totals::CartTotals;
pub use view::{CartRow, CartSummary, CartView, PaymentPanel};
