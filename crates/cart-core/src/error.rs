//! # Checkout Error Types
//!
//! Typed error handling for the cart screen.
//! All cart and checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for cart and checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Line item not present in the cart
    #[error("Item not in cart: {slug}")]
    ItemNotFound { slug: String },

    /// Malformed or overflowing amount
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Currency not supported
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Order creation needs exactly one selected shipping option
    #[error("No shipping option selected")]
    NoShippingSelected,

    /// More than one shipping option claims to be selected
    #[error("{count} shipping options are marked as selected, expected one")]
    AmbiguousShippingSelection { count: usize },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Rate limited by provider
    #[error("Rate limited by {provider}, retry after {retry_after_secs} seconds")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },

    /// Provider rejected our credentials
    #[error("Unauthorized by {provider}: {message}")]
    Unauthorized { provider: String, message: String },

    /// Capture attempted on a screen that is already paid
    #[error("Order already paid")]
    AlreadyPaid,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CheckoutError::NetworkError(_)
                | CheckoutError::RateLimited { .. }
                | CheckoutError::ProviderError { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Configuration(_) => 500,
            CheckoutError::InvalidRequest(_) => 400,
            CheckoutError::ItemNotFound { .. } => 404,
            CheckoutError::InvalidPrice { .. } => 400,
            CheckoutError::UnsupportedCurrency { .. } => 400,
            CheckoutError::NoShippingSelected => 422,
            CheckoutError::AmbiguousShippingSelection { .. } => 422,
            CheckoutError::ProviderError { .. } => 502,
            CheckoutError::NetworkError(_) => 503,
            CheckoutError::RateLimited { .. } => 429,
            CheckoutError::Unauthorized { .. } => 502,
            CheckoutError::AlreadyPaid => 409,
            CheckoutError::Serialization(_) => 500,
            CheckoutError::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::Serialization(err.to_string())
    }
}

/// Result type alias for cart and checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
