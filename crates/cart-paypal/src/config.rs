//! # PayPal Configuration
//!
//! Configuration management for the PayPal integration.
//! All secrets are loaded from environment variables.

use cart_core::CheckoutError;
use std::env;

const SANDBOX_API_BASE: &str = "https://api-m.sandbox.paypal.com";
const LIVE_API_BASE: &str = "https://api-m.paypal.com";
const DEFAULT_RATES_URL: &str = "https://api.paypal.com/v1/shipping/shipping-calculators/";

/// PayPal REST configuration
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    /// REST app client id (also handed to the buttons script)
    pub client_id: String,

    /// REST app secret
    pub client_secret: String,

    /// API base URL (sandbox, live, or a mock server)
    pub api_base_url: String,

    /// Shipping-rate quote endpoint
    pub rates_url: String,
}

impl PayPalConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYPAL_CLIENT_ID` (or `PAYPAL_CLIENT`)
    /// - `PAYPAL_CLIENT_SECRET`
    ///
    /// Optional:
    /// - `PAYPAL_ENVIRONMENT` (`sandbox` or `live`, default `sandbox`)
    /// - `PAYPAL_API_BASE` (overrides the environment's base URL)
    /// - `PAYPAL_SHIPPING_RATES_URL`
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let client_id = env::var("PAYPAL_CLIENT_ID")
            .or_else(|_| env::var("PAYPAL_CLIENT"))
            .map_err(|_| CheckoutError::Configuration("PAYPAL_CLIENT_ID not set".to_string()))?;

        let client_secret = env::var("PAYPAL_CLIENT_SECRET").map_err(|_| {
            CheckoutError::Configuration("PAYPAL_CLIENT_SECRET not set".to_string())
        })?;

        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(CheckoutError::Configuration(
                "PayPal client id and secret must not be empty".to_string(),
            ));
        }

        let api_base_url = match env::var("PAYPAL_API_BASE") {
            Ok(url) => url,
            Err(_) => match env::var("PAYPAL_ENVIRONMENT").as_deref() {
                Ok("live") => LIVE_API_BASE.to_string(),
                Ok("sandbox") | Err(_) => SANDBOX_API_BASE.to_string(),
                Ok(other) => {
                    return Err(CheckoutError::Configuration(format!(
                        "PAYPAL_ENVIRONMENT must be sandbox or live, got {}",
                        other
                    )))
                }
            },
        };

        let rates_url =
            env::var("PAYPAL_SHIPPING_RATES_URL").unwrap_or_else(|_| DEFAULT_RATES_URL.to_string());

        Ok(Self {
            client_id,
            client_secret,
            api_base_url,
            rates_url,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_url: SANDBOX_API_BASE.to_string(),
            rates_url: DEFAULT_RATES_URL.to_string(),
        }
    }

    /// Check if pointed at the live API
    pub fn is_live_mode(&self) -> bool {
        self.api_base_url == LIVE_API_BASE
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set custom rate quote URL
    pub fn with_rates_url(mut self, url: impl Into<String>) -> Self {
        self.rates_url = url.into();
        self
    }
}
