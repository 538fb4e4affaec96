//! # Cart Screen
//!
//! Storefront cart page with PayPal checkout.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYPAL_CLIENT_ID=...
//! export PAYPAL_CLIENT_SECRET=...
//! export PAYPAL_ENVIRONMENT=sandbox
//!
//! # Run the server
//! cart-screen
//! ```

use cart_api::{routes, state::AppState};
use cart_core::CartStore;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Cart items loaded: {}", state.store.items().len());

    let app = routes::create_router(state);

    info!("🛒 Cart screen starting on http://{}", addr);

    if !is_prod {
        info!("🩺 Health: http://{}/health", addr);
        info!("🛍  Cart: http://{}/cart", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🛒 Cart Screen 🛒
  ━━━━━━━━━━━━━━━━━━━━━━━
  PayPal checkout for the storefront cart
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
