//! # cart-api
//!
//! HTTP surface of the cart screen.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Server-rendered cart page hosting the PayPal buttons
//! - JSON endpoints for the buttons' callbacks
//! - One cart screen per visitor session
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/` | Landing page (`?message=`) |
//! | GET | `/cart` | Cart page |
//! | GET | `/api/v1/cart` | Cart view |
//! | POST | `/api/v1/cart/items` | Change item quantity |
//! | DELETE | `/api/v1/cart/items/{slug}` | Remove item |
//! | POST | `/api/v1/cart/widget` | Widget script status |
//! | POST | `/api/v1/cart/orders` | Create order |
//! | PATCH | `/api/v1/cart/orders/{order_id}/shipping` | Shipping change |
//! | POST | `/api/v1/cart/orders/{order_id}/capture` | Approve (capture) |
//! | POST | `/api/v1/cart/errors` | Widget error |

pub mod handlers;
pub mod page;
pub mod routes;
pub mod screens;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
