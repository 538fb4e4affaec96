//! # PayPal Orders
//!
//! `OrderActions` over the PayPal Orders v2 API: the server-side
//! counterpart of the buttons widget's `actions.order.create / patch /
//! capture`.

use crate::client::{PayPalClient, PROVIDER};
use async_trait::async_trait;
use cart_core::{
    CaptureDetails, CheckoutError, CheckoutResult, CreatedOrder, OrderActions, OrderRequest,
    PatchOperation,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

const ORDERS_PATH: &str = "/v2/checkout/orders";
const REQUEST_ID_HEADER: &str = "PayPal-Request-Id";

pub struct PayPalOrders {
    client: Arc<PayPalClient>,
}

impl PayPalOrders {
    pub fn new(client: Arc<PayPalClient>) -> Self {
        Self { client }
    }

    fn order_url(&self, order_id: &str) -> CheckoutResult<String> {
        validate_order_id(order_id)?;
        Ok(self
            .client
            .config()
            .url(&format!("{}/{}", ORDERS_PATH, order_id)))
    }
}

/// PayPal order ids are short alphanumeric tokens; anything else never
/// reaches the URL.
fn validate_order_id(order_id: &str) -> CheckoutResult<()> {
    let valid = !order_id.is_empty()
        && order_id.len() <= 64
        && order_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(CheckoutError::InvalidRequest(format!(
            "Invalid order id: {:?}",
            order_id
        )))
    }
}

#[async_trait]
impl OrderActions for PayPalOrders {
    #[instrument(skip(self, request))]
    async fn create(&self, request: &OrderRequest) -> CheckoutResult<String> {
        let url = self.client.config().url(ORDERS_PATH);
        let created: CreatedOrder = self
            .client
            .send_json(
                self.client
                    .http()
                    .post(url)
                    .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
                    .json(request),
            )
            .await?;

        info!("Created PayPal order: id={}, status={}", created.id, created.status);
        Ok(created.id)
    }

    #[instrument(skip(self, operations), fields(ops = operations.len()))]
    async fn patch(&self, order_id: &str, operations: &[PatchOperation]) -> CheckoutResult<()> {
        let url = self.order_url(order_id)?;
        self.client
            .send(self.client.http().patch(url).json(operations))
            .await?;

        debug!("Patched PayPal order {}", order_id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn capture(&self, order_id: &str) -> CheckoutResult<CaptureDetails> {
        let url = format!("{}/capture", self.order_url(order_id)?);
        let details: CaptureDetails = self
            .client
            .send_json(
                self.client
                    .http()
                    .post(url)
                    .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
                    .json(&serde_json::json!({})),
            )
            .await?;

        info!("Captured PayPal order: id={}, status={}", details.id, details.status);
        Ok(details)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
