//! # Provider Interfaces
//!
//! Capabilities the cart screen needs from the outside world. The payment
//! widget's order actions, the shipping-rate quote service and page
//! navigation are each a trait so the screen can run against the real
//! provider, a mock, or a test double.
//!
//! ```text
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │  OrderActions (trait)    │   │ ShippingRateSource       │
//! │  ├── create()            │   │  └── fetch_rates()       │
//! │  ├── patch()             │   └──────────────────────────┘
//! │  └── capture()           │   ┌──────────────────────────┐
//! └──────────────────────────┘   │ Navigator                │
//!              ▲                 │  └── navigate()          │
//!              │                 └──────────────────────────┘
//!   ┌──────────┴─────────┐
//!   │  PayPalOrders      │
//!   └────────────────────┘
//! ```

use crate::error::CheckoutResult;
use crate::order::{CaptureDetails, OrderRequest, PatchOperation};
use crate::shipping::{RateRequest, ShippingOption};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// Order operations exposed by the payment provider
#[async_trait]
pub trait OrderActions: Send + Sync {
    /// Create an order and return the provider's order id.
    async fn create(&self, request: &OrderRequest) -> CheckoutResult<String>;

    /// Apply JSON-Patch operations to an in-flight order.
    async fn patch(&self, order_id: &str, operations: &[PatchOperation]) -> CheckoutResult<()>;

    /// Capture an approved order.
    async fn capture(&self, order_id: &str) -> CheckoutResult<CaptureDetails>;

    /// Get the provider name (for logging and error messages).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for shared order actions (dynamic dispatch)
pub type BoxedOrderActions = Arc<dyn OrderActions>;

/// Shipping rate quotes
#[async_trait]
pub trait ShippingRateSource: Send + Sync {
    /// Quote shipping options for an address and purchase amount.
    async fn fetch_rates(&self, request: &RateRequest) -> CheckoutResult<Vec<ShippingOption>>;
}

/// Type alias for a shared rate source
pub type BoxedRateSource = Arc<dyn ShippingRateSource>;

/// Where the screen sends the buyer next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    /// Path on this site (e.g., "/")
    pub path: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
}

impl NavigationTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Builder: add a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Site root carrying the thank-you message
    pub fn home_with_message(message: &str) -> Self {
        Self::new("/").with_query("message", message)
    }

    /// Path plus encoded query string
    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

/// Page navigation
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &NavigationTarget);
}

/// Navigator that only logs the target; the HTTP layer turns the returned
/// target into a redirect.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, target: &NavigationTarget) {
        tracing::info!("Navigating to {}", target.to_url());
    }
}

/// Navigator that keeps every target, for callers that inspect them
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<NavigationTarget>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every target navigated to so far
    pub fn visited(&self) -> Vec<NavigationTarget> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent target
    pub fn last(&self) -> Option<NavigationTarget> {
        self.visited().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &NavigationTarget) {
        tracing::info!("Navigating to {}", target.to_url());
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target.clone());
    }
}
