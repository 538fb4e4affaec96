//! # cart-paypal
//!
//! PayPal provider for the cart screen.
//!
//! This crate implements the provider traits from `cart-core` against the
//! PayPal REST API:
//!
//! 1. **PayPalOrders** - Orders v2 API (`OrderActions`)
//!    - Create with line items and shipping breakdown
//!    - Patch amount and shipping on buyer changes
//!    - Capture after approval
//!
//! 2. **PayPalShippingRates** - Shipping calculator (`ShippingRateSource`)
//!    - Quotes options for a sample address and purchase amount
//!
//! Both share one `PayPalClient`, which caches the OAuth access token.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_paypal::{PayPalClient, PayPalOrders, PayPalShippingRates};
//! use std::sync::Arc;
//!
//! let client = Arc::new(PayPalClient::from_env()?);
//! let orders = Arc::new(PayPalOrders::new(client.clone()));
//! let rates = Arc::new(PayPalShippingRates::new(client));
//!
//! let order_id = orders.create(&request).await?;
//! let details = orders.capture(&order_id).await?;
//! ```

pub mod client;
pub mod config;
pub mod orders;
pub mod rates;

// Re-exports
pub use client::PayPalClient;
pub use config::PayPalConfig;
pub use orders::PayPalOrders;
pub use rates::PayPalShippingRates;
