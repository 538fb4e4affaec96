//! # Routes
//!
//! Axum router configuration for the cart screen.

use crate::handlers;
use crate::screens::create_session_layer;
use crate::state::AppState;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Every route runs inside the session layer; the session cookie selects
/// the visitor's cart screen.
///
/// Routes:
/// - Pages:
///   - GET /        - Landing page (`?message=` after payment)
///   - GET /cart    - Cart page
///   - GET /health  - Health check
///
/// - Cart API (`/api/v1/cart`):
///   - GET    /                          - Cart view
///   - POST   /items                     - Change item quantity
///   - DELETE /items/{slug}              - Remove item
///   - POST   /widget                    - Widget script status
///   - POST   /orders                    - createOrder
///   - PATCH  /orders/{order_id}/shipping - onShippingChange
///   - POST   /orders/{order_id}/capture  - onApprove
///   - POST   /errors                    - onError
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let sessions = create_session_layer(&state.config);

    let cart_routes = Router::new()
        .route("/", get(handlers::get_cart))
        .route("/items", post(handlers::update_item))
        .route("/items/{slug}", delete(handlers::remove_item))
        .route("/widget", post(handlers::widget_status))
        .route("/orders", post(handlers::create_order))
        .route("/orders/{order_id}/shipping", patch(handlers::shipping_change))
        .route("/orders/{order_id}/capture", post(handlers::capture_order))
        .route("/errors", post(handlers::report_error));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::home))
        .route("/cart", get(handlers::cart_page))
        .nest("/api/v1/cart", cart_routes)
        // Middleware
        .layer(sessions)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::SESSION_COOKIE_NAME;
    use crate::state::AppConfig;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use cart_core::{
        CaptureDetails, CartStore, CheckoutError, CheckoutResult, Currency, LineItem,
        MemoryCartStore, Money, OrderActions, OrderRequest, PatchOperation, Price, RateRequest,
        ScreenConfig, ShippingOption, ShippingRateSource,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Default)]
    struct FakePayPal {
        rate_calls: AtomicU32,
        no_selection: bool,
        created: Mutex<Vec<OrderRequest>>,
        patched: Mutex<Vec<(String, Vec<PatchOperation>)>>,
    }

    #[async_trait]
    impl ShippingRateSource for FakePayPal {
        async fn fetch_rates(&self, _request: &RateRequest) -> CheckoutResult<Vec<ShippingOption>> {
            self.rate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![
                ShippingOption {
                    id: "ground".to_string(),
                    label: "Ground".to_string(),
                    kind: Some("SHIPPING".to_string()),
                    amount: Money::new(Currency::USD, "5.00"),
                    selected: !self.no_selection,
                },
                ShippingOption {
                    id: "air".to_string(),
                    label: "Air".to_string(),
                    kind: Some("SHIPPING".to_string()),
                    amount: Money::new(Currency::USD, "12.00"),
                    selected: false,
                },
            ])
        }
    }

    #[async_trait]
    impl OrderActions for FakePayPal {
        async fn create(&self, request: &OrderRequest) -> CheckoutResult<String> {
            self.created.lock().unwrap().push(request.clone());
            Ok("5O190127TN364715T".to_string())
        }

        async fn patch(&self, order_id: &str, operations: &[PatchOperation]) -> CheckoutResult<()> {
            self.patched
                .lock()
                .unwrap()
                .push((order_id.to_string(), operations.to_vec()));
            Ok(())
        }

        async fn capture(&self, order_id: &str) -> CheckoutResult<CaptureDetails> {
            if order_id == "DECLINED" {
                return Err(CheckoutError::ProviderError {
                    provider: "paypal".to_string(),
                    message: "INSTRUMENT_DECLINED".to_string(),
                });
            }
            Ok(serde_json::from_value(json!({
                "id": order_id,
                "status": "COMPLETED",
                "payer": { "name": { "given_name": "Jane Q", "surname": "Doe" } }
            }))
            .unwrap())
        }

        fn provider_name(&self) -> &'static str {
            "fake"
        }
    }

    struct TestApp {
        router: Router,
        paypal: Arc<FakePayPal>,
        store: Arc<MemoryCartStore>,
    }

    impl TestApp {
        /// A browser with its own cookie jar
        fn browser(&self) -> Browser {
            Browser {
                router: self.router.clone(),
                cookie: None,
            }
        }
    }

    fn test_config(base_url: &str) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            base_url: base_url.to_string(),
            environment: "test".to_string(),
        }
    }

    fn test_app_on(base_url: &str, items: Vec<LineItem>, no_selection: bool) -> TestApp {
        let paypal = Arc::new(FakePayPal {
            no_selection,
            ..FakePayPal::default()
        });
        let store = Arc::new(MemoryCartStore::with_items(items));
        let state = AppState::with_providers(
            test_config(base_url),
            ScreenConfig::new("test-client"),
            store.clone(),
            paypal.clone(),
            paypal.clone(),
        );
        TestApp {
            router: create_router(state),
            paypal,
            store,
        }
    }

    fn test_app_with(items: Vec<LineItem>, no_selection: bool) -> TestApp {
        test_app_on("http://localhost:8080", items, no_selection)
    }

    fn sample_items() -> Vec<LineItem> {
        vec![
            LineItem::new("zelda", "Zelda", Price::from_cents(1000, Currency::USD), 2)
                .with_category("nes"),
            LineItem::new("tetris", "Tetris", Price::from_cents(500, Currency::USD), 1),
        ]
    }

    fn test_app() -> TestApp {
        test_app_with(sample_items(), false)
    }

    struct Browser {
        router: Router,
        cookie: Option<String>,
    }

    impl Browser {
        async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(cookie) = &self.cookie {
                builder = builder.header(header::COOKIE, cookie);
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
                let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
                self.cookie = Some(pair.to_string());
            }

            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, String::from_utf8(bytes.to_vec()).unwrap())
        }

        async fn send_json(&mut self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let (status, text) = self.send(method, uri, body).await;
            let value = if text.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).unwrap()
            };
            (status, value)
        }
    }

    async fn first_set_cookie(app: &TestApp) -> String {
        let request = Request::builder().uri("/cart").body(Body::empty()).unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = app.browser().send_json(Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_cart_page_fetches_rates_on_every_load() {
        let app = test_app();
        let mut browser = app.browser();

        let (status, html) = browser.send(Method::GET, "/cart", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Total (3) : $25.00"));
        assert!(html.contains("Loading..."));

        browser.send(Method::GET, "/cart", None).await;
        assert_eq!(app.paypal.rate_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reload_resets_widget_status() {
        let app = test_app();
        let mut browser = app.browser();
        browser.send(Method::GET, "/cart", None).await;
        browser
            .send(Method::POST, "/api/v1/cart/widget", Some(json!({ "status": "rejected" })))
            .await;

        let (_, html) = browser.send(Method::GET, "/cart", None).await;

        assert!(html.contains("Loading..."));
    }

    #[tokio::test]
    async fn test_session_cookie() {
        let cookie = first_set_cookie(&test_app()).await;
        assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE_NAME)));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));

        let https = test_app_on("https://shop.example.com", sample_items(), false);
        assert!(first_set_cookie(&https).await.contains("Secure"));
    }

    #[tokio::test]
    async fn test_empty_cart_page() {
        let app = test_app_with(Vec::new(), false);
        let (status, html) = app.browser().send(Method::GET, "/cart", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Cart is empty."));
        assert!(!html.contains("<table"));
    }

    #[tokio::test]
    async fn test_widget_status_switches_panel() {
        let app = test_app();
        let mut browser = app.browser();
        browser.send(Method::GET, "/cart", None).await;

        let (status, view) = browser
            .send_json(Method::POST, "/api/v1/cart/widget", Some(json!({ "status": "resolved" })))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["state"], "filled");
        assert_eq!(view["summary"]["payment"]["kind"], "buttons");
        assert_eq!(view["summary"]["payment"]["client_id"], "test-client");
    }

    #[tokio::test]
    async fn test_remove_item() {
        let app = test_app();
        let mut browser = app.browser();

        let (status, view) = browser
            .send_json(Method::DELETE, "/api/v1/cart/items/tetris", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["rows"].as_array().unwrap().len(), 1);
        assert_eq!(app.store.items()[0].slug, "zelda");

        let (status, body) = browser
            .send_json(Method::DELETE, "/api/v1/cart/items/tetris", None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_update_item_quantity() {
        let app = test_app();

        let (status, view) = app
            .browser()
            .send_json(
                Method::POST,
                "/api/v1/cart/items",
                Some(json!({ "slug": "tetris", "quantity": 3 })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["summary"]["total_quantity"], 5);
        assert_eq!(app.store.find("tetris").unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_checkout_flow() {
        let app = test_app();
        let mut browser = app.browser();
        browser.send(Method::GET, "/cart", None).await;

        let (status, order) = browser.send_json(Method::POST, "/api/v1/cart/orders", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["id"], "5O190127TN364715T");

        {
            let created = app.paypal.created.lock().unwrap();
            let unit = created[0].purchase_unit().unwrap();
            assert_eq!(unit.amount.breakdown.item_total.value, "25.00");
            assert_eq!(unit.amount.breakdown.shipping.value, "5.00");
            assert_eq!(unit.items.len(), 2);
        }

        let (status, _) = browser
            .send(
                Method::PATCH,
                "/api/v1/cart/orders/5O190127TN364715T/shipping",
                Some(json!({
                    "shipping_option": {
                        "id": "air",
                        "label": "Air",
                        "type": "SHIPPING",
                        "amount": { "currency_code": "USD", "value": "12.00" },
                        "selected": true
                    },
                    "shipping_address": {
                        "recipient_name": "Jane Doe",
                        "address_line_1": "2211 N First Street",
                        "admin_area_1": "CA",
                        "admin_area_2": "San Jose",
                        "postal_code": "95131",
                        "country_code": "US"
                    }
                })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(app.paypal.patched.lock().unwrap()[0].0, "5O190127TN364715T");

        let (status, approved) = browser
            .send_json(Method::POST, "/api/v1/cart/orders/5O190127TN364715T/capture", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(approved["redirect"], "/?message=Jane%20Q");

        let (status, body) = browser
            .send_json(Method::POST, "/api/v1/cart/orders/5O190127TN364715T/capture", None)
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 409);
    }

    #[tokio::test]
    async fn test_shipping_change_with_partial_address() {
        let app = test_app();
        let mut browser = app.browser();
        browser.send(Method::GET, "/cart", None).await;
        browser.send(Method::POST, "/api/v1/cart/orders", None).await;

        let (status, _) = browser
            .send(
                Method::PATCH,
                "/api/v1/cart/orders/5O190127TN364715T/shipping",
                Some(json!({
                    "shipping_option": {
                        "id": "ground",
                        "amount": { "currency_code": "USD", "value": "5.00" },
                        "selected": true
                    },
                    "shipping_address": {
                        "city": "San Jose",
                        "state": "CA",
                        "postal_code": "95131",
                        "country_code": "US"
                    }
                })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let patched = app.paypal.patched.lock().unwrap();
        let address = patched[0]
            .1
            .iter()
            .find(|op| op.path.ends_with("shipping/address"))
            .and_then(|op| op.value.clone())
            .unwrap();
        assert_eq!(address["address_line_1"], "");
        assert_eq!(address["admin_area_1"], "CA");
        assert_eq!(address["admin_area_2"], "San Jose");
    }

    #[tokio::test]
    async fn test_visitors_have_separate_screens() {
        let app = test_app();
        let mut alice = app.browser();
        let mut bob = app.browser();
        alice.send(Method::GET, "/cart", None).await;
        bob.send(Method::GET, "/cart", None).await;

        alice.send(Method::POST, "/api/v1/cart/orders", None).await;
        let (status, _) = alice
            .send_json(Method::POST, "/api/v1/cart/orders/5O190127TN364715T/capture", None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, view) = bob.send_json(Method::GET, "/api/v1/cart", None).await;
        assert_eq!(view["summary"]["payment"]["kind"], "loading");

        let (status, order) = bob.send_json(Method::POST, "/api/v1/cart/orders", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(order["id"], "5O190127TN364715T");
        assert_ne!(alice.cookie, bob.cookie);
    }

    #[tokio::test]
    async fn test_create_order_without_selection() {
        let app = test_app_with(
            vec![LineItem::new("tetris", "Tetris", Price::from_cents(500, Currency::USD), 1)],
            true,
        );
        let mut browser = app.browser();
        browser.send(Method::GET, "/cart", None).await;

        let (status, body) = browser.send_json(Method::POST, "/api/v1/cart/orders", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "No shipping option selected");
        assert!(app.paypal.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_capture_keeps_unpaid() {
        let app = test_app();
        let mut browser = app.browser();
        browser.send(Method::GET, "/cart", None).await;

        let (status, body) = browser
            .send_json(Method::POST, "/api/v1/cart/orders/DECLINED/capture", None)
            .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["details"], "retryable");

        let (_, view) = browser.send_json(Method::GET, "/api/v1/cart", None).await;
        assert_ne!(view["summary"]["payment"]["kind"], "hidden");
    }

    #[tokio::test]
    async fn test_report_error() {
        let app = test_app();
        let (status, _) = app
            .browser()
            .send(
                Method::POST,
                "/api/v1/cart/errors",
                Some(json!({ "message": "Window closed" })),
            )
            .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_home_shows_message() {
        let app = test_app();
        let (status, html) = app
            .browser()
            .send(Method::GET, "/?message=Jane%20Q", None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Thank you, Jane Q!"));
    }
}
