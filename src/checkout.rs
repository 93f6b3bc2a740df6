//! Checkout
//!
//! The order-submission port and its HTTP implementation. The cart hands its lines and the
//! shopper's chosen address to an [`OrderApi`]; what the backend does with them is its own
//! business.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartLineItem;

/// Free-form delivery address, passed through to the order API untouched.
pub type Address = serde_json::Map<String, serde_json::Value>;

/// Errors raised while talking to the order API.
#[derive(Debug, Error)]
pub enum OrderApiError {
    /// An HTTP transport or serialization error occurred.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("{0}")]
    UnexpectedResponse(String),
}

/// Body sent to the order API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutRequest {
    /// The cart lines being ordered
    pub cart: Vec<CartLineItem>,

    /// The address the shopper selected
    #[serde(rename = "selectedAddress")]
    pub selected_address: Address,
}

/// Body returned by the order API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CheckoutResponse {
    /// Whether the order was accepted
    #[serde(default)]
    pub success: bool,

    /// Where to send the shopper next (usually a payment page)
    #[serde(default, alias = "url", alias = "redirectUrl")]
    pub redirect_url: Option<String>,

    /// Human readable explanation, typically present on failure
    #[serde(default)]
    pub message: Option<String>,
}

/// What happened after a successful checkout submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The shopper must continue at this URL.
    Redirect(String),

    /// The order was placed and no further step is needed.
    Placed {
        /// Optional confirmation message from the API
        message: Option<String>,
    },
}

/// Submits orders to the backend.
#[automock]
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Submit a checkout request.
    async fn submit_order(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutResponse, OrderApiError>;
}

/// Configuration for the HTTP order API.
#[derive(Debug, Clone)]
pub struct OrderApiConfig {
    /// Backend base URL, e.g. `"https://api.example.com"`.
    pub base_url: String,

    /// Optional bearer token for the signed-in shopper.
    pub token: Option<String>,
}

/// [`OrderApi`] over HTTP, posting JSON to `<base_url>/orders/checkout`.
#[derive(Debug, Clone)]
pub struct HttpOrderApi {
    config: OrderApiConfig,
    http: Client,
}

impl HttpOrderApi {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: OrderApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// The URL orders are posted to.
    pub fn checkout_url(&self) -> String {
        format!("{}/orders/checkout", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    #[tracing::instrument(skip(self, request), fields(lines = request.cart.len()))]
    async fn submit_order(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutResponse, OrderApiError> {
        let mut builder = self.http.post(self.checkout_url()).json(request);

        if let Some(token) = &self.config.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(OrderApiError::UnexpectedResponse(format!(
                "checkout request failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}
