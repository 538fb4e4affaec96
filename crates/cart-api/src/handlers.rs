//! # Request Handlers
//!
//! Axum request handlers for the cart screen: the HTML pages and the JSON
//! endpoints the payment widget calls back into.

use crate::page;
use crate::screens::{self, SharedScreen};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use cart_core::{CartView, CheckoutError, ScriptStatus, ShippingChange};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{error, info, instrument};

/// Provider name used when the widget reports an error
const WIDGET_PROVIDER: &str = "paypal-buttons";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Landing page query
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub message: Option<String>,
}

/// Quantity change for an item already in the cart
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub slug: String,
    pub quantity: u32,
}

/// Widget script load status
#[derive(Debug, Deserialize)]
pub struct WidgetStatusRequest {
    pub status: ScriptStatus,
}

/// Error reported by the widget's `onError`
#[derive(Debug, Deserialize)]
pub struct WidgetErrorRequest {
    pub message: String,
}

/// Created order
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    /// Provider order id handed back to the widget
    pub id: String,
}

/// Result of approving an order
#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    /// Where the browser goes next
    pub redirect: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);
    if err.is_retryable() {
        response = response.with_details("retryable");
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// The calling visitor's screen
async fn visitor_screen(state: &AppState, session: &Session) -> Result<SharedScreen, ApiError> {
    let visitor = screens::visitor_id(session).await.map_err(|e| {
        error!("Session unavailable: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Session unavailable", 500)),
        )
    })?;
    Ok(state.screens.screen(&visitor))
}

// =============================================================================
// Pages
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "cart-screen",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Landing page, showing `?message=` after a payment
pub async fn home(Query(query): Query<HomeQuery>) -> Html<String> {
    Html(page::home(query.message.as_deref()))
}

/// Cart page. Every load mounts the screen afresh and fetches shipping rates.
#[instrument(skip(state, session))]
pub async fn cart_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, ApiError> {
    let screen = visitor_screen(&state, &session).await?;
    let mut screen = screen.lock().await;
    screen.remount().await;

    let view = screen.view().map_err(checkout_error_to_response)?;
    Ok(Html(page::cart(&view, &state.client_id, &state.currency)))
}

// =============================================================================
// Cart API
// =============================================================================

/// Current cart view
pub async fn get_cart(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartView>, ApiError> {
    let screen = visitor_screen(&state, &session).await?;
    let screen = screen.lock().await;
    screen.view().map(Json).map_err(checkout_error_to_response)
}

/// Change the quantity of an item (CART_ADD_ITEM)
#[instrument(skip(state, session, request), fields(slug = %request.slug))]
pub async fn update_item(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<CartView>, ApiError> {
    let screen = visitor_screen(&state, &session).await?;
    let screen = screen.lock().await;
    screen
        .update_quantity(&request.slug, request.quantity)
        .map_err(checkout_error_to_response)?;

    screen.view().map(Json).map_err(checkout_error_to_response)
}

/// Remove an item (CART_REMOVE_ITEM)
#[instrument(skip(state, session))]
pub async fn remove_item(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    let screen = visitor_screen(&state, &session).await?;
    let screen = screen.lock().await;
    screen
        .remove_item(&slug)
        .map_err(checkout_error_to_response)?;

    info!("Removed {} from cart", slug);
    screen.view().map(Json).map_err(checkout_error_to_response)
}

/// Widget script finished loading (or failed to)
pub async fn widget_status(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<WidgetStatusRequest>,
) -> Result<Json<CartView>, ApiError> {
    let screen = visitor_screen(&state, &session).await?;
    let mut screen = screen.lock().await;
    screen.set_script_status(request.status);

    screen.view().map(Json).map_err(checkout_error_to_response)
}

// =============================================================================
// Widget callbacks
// =============================================================================

/// `createOrder`
#[instrument(skip(state, session))]
pub async fn create_order(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let screen = visitor_screen(&state, &session).await?;
    let mut screen = screen.lock().await;
    let id = screen.create_order().await.map_err(|e| {
        error!("Order creation failed: {}", e);
        checkout_error_to_response(e)
    })?;

    Ok(Json(CreateOrderResponse { id }))
}

/// `onShippingChange`
#[instrument(skip(state, session, change))]
pub async fn shipping_change(
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<String>,
    Json(change): Json<ShippingChange>,
) -> Result<StatusCode, ApiError> {
    let screen = visitor_screen(&state, &session).await?;
    let screen = screen.lock().await;
    screen
        .shipping_change(&order_id, &change)
        .await
        .map_err(|e| {
            error!("Shipping update for {} failed: {}", order_id, e);
            checkout_error_to_response(e)
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// `onApprove`: capture and tell the browser where to go
#[instrument(skip(state, session))]
pub async fn capture_order(
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<String>,
) -> Result<Json<ApproveResponse>, ApiError> {
    let screen = visitor_screen(&state, &session).await?;
    let mut screen = screen.lock().await;
    let target = screen.approve(&order_id).await.map_err(|e| {
        error!("Capture of {} failed: {}", order_id, e);
        checkout_error_to_response(e)
    })?;

    Ok(Json(ApproveResponse {
        redirect: target.to_url(),
    }))
}

/// `onError`
pub async fn report_error(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<WidgetErrorRequest>,
) -> Result<StatusCode, ApiError> {
    let screen = visitor_screen(&state, &session).await?;
    let screen = screen.lock().await;
    screen.report_error(&CheckoutError::ProviderError {
        provider: WIDGET_PROVIDER.to_string(),
        message: request.message,
    });

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
        assert!(err.details.is_none());
    }

    #[test]
    fn test_checkout_error_conversion() {
        let (status, _json) = checkout_error_to_response(CheckoutError::NoShippingSelected);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, Json(body)) =
            checkout_error_to_response(CheckoutError::NetworkError("reset".to_string()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.details.as_deref(), Some("retryable"));
    }
}
