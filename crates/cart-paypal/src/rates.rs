//! # Shipping Rates
//!
//! Quotes shipping options for a sample address and purchase amount.

use crate::client::{PayPalClient, PROVIDER};
use async_trait::async_trait;
use cart_core::{CheckoutResult, RateRequest, RateResponse, ShippingOption, ShippingRateSource};
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct PayPalShippingRates {
    client: Arc<PayPalClient>,
}

impl PayPalShippingRates {
    pub fn new(client: Arc<PayPalClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ShippingRateSource for PayPalShippingRates {
    #[instrument(skip(self, request), fields(provider = PROVIDER))]
    async fn fetch_rates(&self, request: &RateRequest) -> CheckoutResult<Vec<ShippingOption>> {
        let url = self.client.config().rates_url.clone();
        let response: RateResponse = self
            .client
            .send_json(self.client.http().post(url).json(request))
            .await?;

        debug!("Received {} shipping options", response.shipping_options.len());
        Ok(response.shipping_options)
    }
}
