//! Order submission to the storefront API.
//!
//! Checkout posts the cart contents and customer details to the
//! `checkout.create_order` API method. The storefront answers with a
//! Frappe-style envelope:
//!
//! ```json
//! {"message": {"success": true, "order_id": "SAL-ORD-2026-00042", "payment_url": "https://..."}}
//! {"message": {"success": false, "error": "Failed to create order"}}
//! ```
//!
//! There is one request per submission. It is not retried and the cart is
//! only cleared once the API confirms the order.

use std::time::Duration;

use garval_core::{Price, PriceError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::item::LineItem;
use crate::store::CartStore;

/// API method name appended to the API base.
const CREATE_ORDER_METHOD: &str = "checkout.create_order";

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no items.
    #[error("cart is empty")]
    EmptyCart,

    /// Required customer details are missing.
    #[error("invalid customer info: {0}")]
    InvalidCustomer(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-JSON error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The API answered but did not create the order.
    #[error("order rejected: {0}")]
    Rejected(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The endpoint URL could not be built.
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The cart total cannot be sent as an exact amount.
    #[error("invalid order total: {0}")]
    Total(#[from] PriceError),
}

/// Customer details collected by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Payment gateway chosen by the customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Name of a saved address to ship to instead of `address`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_address: Option<String>,
}

impl CustomerInfo {
    /// Check that the fields the order API cannot do without are present.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidCustomer` when the name is blank or
    /// the email has no `@` between non-empty parts.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.full_name.trim().is_empty() {
            return Err(CheckoutError::InvalidCustomer(
                "full name is required".to_string(),
            ));
        }

        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !valid_email {
            return Err(CheckoutError::InvalidCustomer(format!(
                "invalid email: {email}"
            )));
        }

        Ok(())
    }
}

/// Body of the create-order request.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub customer_info: CustomerInfo,
    pub items: Vec<LineItem>,
    pub total: Price,
}

impl OrderRequest {
    /// Snapshot the cart into an order request.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no items, or
    /// `CheckoutError::InvalidCustomer` if the customer details are incomplete,
    /// or `CheckoutError::Total` if the total cannot be sent exactly.
    pub fn from_cart(cart: &CartStore, customer_info: CustomerInfo) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        customer_info.validate()?;

        Ok(Self {
            customer_info,
            items: cart.items().to_vec(),
            total: Price::new(cart.total())?,
        })
    }
}

/// A confirmed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_id: String,
    /// Hosted payment page to send the customer to, when the gateway has one.
    pub payment_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    message: Option<CreateOrderResponse>,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    #[serde(default)]
    success: bool,
    order_id: Option<String>,
    payment_url: Option<String>,
    error: Option<String>,
}

/// HTTP client for the create-order API method.
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl CheckoutClient {
    /// Create a client posting to `{api_base}.checkout.create_order`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the endpoint is
    /// not a valid URL.
    pub fn new(api_base: &Url, timeout: Duration) -> Result<Self, CheckoutError> {
        let base = api_base.as_str().trim_end_matches('/');
        let endpoint = Url::parse(&format!("{base}.{CREATE_ORDER_METHOD}"))?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    /// The URL orders are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Post an order and interpret the API envelope.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the response cannot be parsed, or
    /// the API reports that no order was created.
    #[instrument(skip(self, request), fields(items = request.items.len(), total = %request.total))]
    pub async fn create_order(
        &self,
        request: &OrderRequest,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(CheckoutError::Parse(e.to_string())),
            Err(_) => {
                return Err(CheckoutError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }
        };

        match envelope.message {
            Some(CreateOrderResponse {
                success: true,
                order_id: Some(order_id),
                payment_url,
                ..
            }) => {
                info!(%order_id, "Order created");
                Ok(OrderConfirmation {
                    order_id,
                    payment_url,
                })
            }
            Some(CreateOrderResponse { error, .. }) => {
                let message = error.unwrap_or_else(|| "order was not created".to_string());
                warn!(%status, %message, "Order rejected");
                Err(CheckoutError::Rejected(message))
            }
            None => {
                warn!(%status, "Order response had no message");
                Err(CheckoutError::Rejected("order was not created".to_string()))
            }
        }
    }
}

/// Submit the cart as an order, clearing it once the order is confirmed.
///
/// # Errors
///
/// Returns error if the cart is empty, the customer details are incomplete,
/// or the order API call fails. The cart is left untouched on error.
pub async fn submit_order(
    cart: &mut CartStore,
    client: &CheckoutClient,
    customer_info: CustomerInfo,
) -> Result<OrderConfirmation, CheckoutError> {
    let request = OrderRequest::from_cart(cart, customer_info)?;
    let confirmation = client.create_order(&request).await?;
    cart.clear();
    Ok(confirmation)
}
