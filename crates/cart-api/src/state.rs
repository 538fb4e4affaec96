//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the per-visitor cart screens, the cart store and configuration.

use crate::screens::{ScreenFactory, ScreenRegistry, SESSION_EXPIRY_SECONDS};
use cart_core::{
    BoxedOrderActions, BoxedRateSource, CartScreen, LoggingNavigator, MemoryCartStore,
    RateRequest, ScreenConfig, SharedCartStore,
};
use cart_paypal::{PayPalClient, PayPalOrders, PayPalShippingRates};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of this service; `https://` marks session cookies secure
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// One cart screen per visitor
    pub screens: Arc<ScreenRegistry>,
    /// Cart store the screen reads from
    pub store: SharedCartStore,
    /// Public client id for the buttons script
    pub client_id: String,
    /// Currency code for the buttons script
    pub currency: String,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by PayPal
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let cart_file = load_cart_file()?;

        let client = PayPalClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize PayPal: {}", e))?;
        let client = Arc::new(client);

        let mut screen_config = ScreenConfig::new(client.config().client_id.clone());
        if let Some(request) = cart_file.rate_request {
            screen_config = screen_config.with_rate_request(request);
        }

        Ok(Self::with_providers(
            config,
            screen_config,
            Arc::new(cart_file.store),
            Arc::new(PayPalOrders::new(client.clone())),
            Arc::new(PayPalShippingRates::new(client)),
        ))
    }

    /// Assemble state from explicit parts
    pub fn with_providers(
        config: AppConfig,
        screen_config: ScreenConfig,
        store: SharedCartStore,
        actions: BoxedOrderActions,
        rates: BoxedRateSource,
    ) -> Self {
        let client_id = screen_config.client_id.clone();
        let currency = screen_config.currency.as_str().to_string();
        let screen_store = store.clone();
        let factory: ScreenFactory = Arc::new(move || {
            CartScreen::new(
                screen_config.clone(),
                screen_store.clone(),
                actions.clone(),
                rates.clone(),
                Arc::new(LoggingNavigator),
            )
        });
        let idle_timeout = Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs());

        Self {
            screens: Arc::new(ScreenRegistry::new(factory, idle_timeout)),
            store,
            client_id,
            currency,
            config,
        }
    }
}

/// Contents of `config/cart.toml`
struct CartFile {
    store: MemoryCartStore,
    rate_request: Option<RateRequest>,
}

#[derive(Debug, Default, Deserialize)]
struct RateSection {
    #[serde(default)]
    rate_request: Option<RateRequest>,
}

impl CartFile {
    fn parse(content: &str) -> anyhow::Result<Self> {
        let store = MemoryCartStore::from_toml(content)?;
        let section: RateSection = toml::from_str(content)?;
        Ok(Self {
            store,
            rate_request: section.rate_request,
        })
    }
}

/// Load seed items and the rate request override from config file
fn load_cart_file() -> anyhow::Result<CartFile> {
    let config_paths = [
        "config/cart.toml",
        "../config/cart.toml",
        "../../config/cart.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let file = CartFile::parse(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded cart config from {}", path);
            return Ok(file);
        }
    }

    tracing::warn!("No cart config found, starting with an empty cart");
    Ok(CartFile {
        store: MemoryCartStore::new(),
        rate_request: None,
    })
}
