//! # PayPal REST Client
//!
//! OAuth token handling and response/error mapping shared by the order and
//! shipping-rate calls.

use crate::config::PayPalConfig;
use cart_core::{CheckoutError, CheckoutResult, ProviderErrorBody};
use chrono::{DateTime, Duration, Utc};
use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, error};

pub(crate) const PROVIDER: &str = "paypal";

/// Tokens are refreshed this long before PayPal says they expire
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        self.expires_at - Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) > Utc::now()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Authenticated PayPal REST client
pub struct PayPalClient {
    config: PayPalConfig,
    http: Client,
    token: Mutex<Option<AccessToken>>,
}

impl PayPalClient {
    /// Create a new client
    pub fn new(config: PayPalConfig) -> CheckoutResult<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            http,
            token: Mutex::new(None),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Self::new(PayPalConfig::from_env()?)
    }

    pub fn config(&self) -> &PayPalConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Bearer token, fetched with client credentials and cached until
    /// shortly before it expires
    pub async fn access_token(&self) -> CheckoutResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        debug!("Requesting PayPal access token");
        let response = self
            .http
            .post(self.config.url("/v1/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("PayPal token error: status={}, body={}", status, body);
            return Err(CheckoutError::Unauthorized {
                provider: PROVIDER.to_string(),
                message: describe(status, &body),
            });
        }

        let token: TokenResponse = parse(&body)?;
        let fresh = AccessToken {
            value: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        };
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn forget_token(&self) {
        *self.token.lock().await = None;
    }

    /// Send an authenticated request and return the raw body of a 2xx
    pub(crate) async fn send(&self, request: RequestBuilder) -> CheckoutResult<String> {
        let token = self.access_token().await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::NetworkError(e.to_string()))?;

        if status.is_success() {
            return Ok(body);
        }

        error!("PayPal API error: status={}, body={}", status, body);

        match status {
            StatusCode::UNAUTHORIZED => {
                self.forget_token().await;
                Err(CheckoutError::Unauthorized {
                    provider: PROVIDER.to_string(),
                    message: describe(status, &body),
                })
            }
            StatusCode::TOO_MANY_REQUESTS => Err(CheckoutError::RateLimited {
                provider: PROVIDER.to_string(),
                retry_after_secs: retry_after.unwrap_or(60),
            }),
            _ => Err(CheckoutError::ProviderError {
                provider: PROVIDER.to_string(),
                message: describe(status, &body),
            }),
        }
    }

    /// Send an authenticated request and parse the JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> CheckoutResult<T> {
        let body = self.send(request).await?;
        parse(&body)
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> CheckoutResult<T> {
    serde_json::from_str(body).map_err(|e| {
        CheckoutError::Serialization(format!("Failed to parse PayPal response: {}", e))
    })
}

/// Human-readable error from a PayPal error body, falling back to the raw body
fn describe(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ProviderErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.summary())
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body))
}
