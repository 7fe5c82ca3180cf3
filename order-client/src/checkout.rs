//! Order submission pipeline, client half
//!
//! Validation gate first: a malformed submission performs no side
//! effects and leaves the cart untouched. On success the server-assigned
//! id is the only identifier ever shown; no client-side id is generated.
//! The cart is cleared exactly once, after the store accepts the order.

use thiserror::Error;

use crate::cart::{Cart, CartStore};
use crate::error::ClientError;
use crate::http::OrderApi;
use shared::client::{CreateOrderRequest, InitiatePaymentRequest, InitiatePaymentResponse};
use shared::order::{OrderLine, OrderType};
use shared::validate::{normalize_phone, validate_create_order};
use shared::ValidationError;

/// Customer details captured by the checkout form
#[derive(Debug, Clone, Default)]
pub struct CustomerDetails {
    pub name: String,
    /// May contain formatting; normalized to digits before validation
    pub phone: String,
    pub email: Option<String>,
    pub table_number: Option<String>,
    pub special_request: Option<String>,
}

/// Local receipt for the offline-tolerant path. `order_id` is None when
/// the store could not be reached; no identifier is ever invented for
/// an order the server has not numbered.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub order_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub lines: Vec<OrderLine>,
    pub total_cents: i64,
}

/// Where to send the customer after a paid submission
#[derive(Debug, Clone)]
pub struct PaymentHandoff {
    pub order_id: String,
    pub payment_url: String,
    /// True when the gateway is unconfigured and the order was
    /// mock-settled
    pub mock: bool,
}

/// Submission failure
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Input rejected by the validation gate; nothing was sent anywhere
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The order store rejected or could not receive the submission
    #[error("Order submission failed: {0}")]
    Store(ClientError),

    /// The order was created but the payment gateway step failed; the
    /// order remains NEW/UNPAID for manual reconciliation
    #[error("Payment initiation failed: {0}")]
    Gateway(ClientError),
}

/// The checkout pipeline
pub struct Checkout<'a, A: OrderApi> {
    api: &'a A,
}

impl<'a, A: OrderApi> Checkout<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    fn build_request<S: CartStore>(
        cart: &Cart<S>,
        details: &CustomerDetails,
        order_type: OrderType,
    ) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: details.name.trim().to_string(),
            customer_phone: normalize_phone(&details.phone),
            customer_email: details.email.clone().filter(|e| !e.is_empty()),
            table_number: if order_type.requires_table() {
                details.table_number.clone()
            } else {
                None
            },
            special_request: details
                .special_request
                .clone()
                .filter(|r| !r.trim().is_empty()),
            order_type,
            items: cart.to_order_lines(),
            total_cents: cart.total_cents(),
        }
    }

    /// Submit the cart and return the server-assigned order id.
    ///
    /// The cart is cleared only after the store confirms the insert.
    pub async fn submit<S: CartStore>(
        &self,
        cart: &mut Cart<S>,
        details: &CustomerDetails,
        order_type: OrderType,
    ) -> Result<String, SubmitError> {
        let req = Self::build_request(cart, details, order_type);
        validate_create_order(&req)?;

        let resp = self
            .api
            .create_order(&req)
            .await
            .map_err(SubmitError::Store)?;

        cart.clear();
        tracing::info!(order_id = %resp.order_id, "Order submitted");
        Ok(resp.order_id)
    }

    /// Submit and hand off to the hosted payment page.
    ///
    /// The cart clears as soon as the order exists; a gateway failure
    /// after that surfaces as [`SubmitError::Gateway`] without rolling
    /// the order back.
    pub async fn submit_and_pay<S: CartStore>(
        &self,
        cart: &mut Cart<S>,
        details: &CustomerDetails,
        order_type: OrderType,
    ) -> Result<PaymentHandoff, SubmitError> {
        let amount_cents = cart.total_cents();
        let order_id = self.submit(cart, details, order_type).await?;

        let resp: InitiatePaymentResponse = self
            .api
            .initiate_payment(&InitiatePaymentRequest {
                order_id: order_id.clone(),
                amount_cents,
                customer_name: details.name.trim().to_string(),
                customer_email: details.email.clone().filter(|e| !e.is_empty()),
                customer_phone: Some(normalize_phone(&details.phone)),
            })
            .await
            .map_err(SubmitError::Gateway)?;

        Ok(PaymentHandoff {
            order_id,
            payment_url: resp.payment_url,
            mock: resp.mock,
        })
    }

    /// Offline-tolerant cash-like path: always produces a local receipt
    /// once validation passes. A transient network failure while relaying
    /// the order is logged and the receipt simply carries no server id;
    /// any other store rejection is surfaced.
    pub async fn submit_with_receipt<S: CartStore>(
        &self,
        cart: &mut Cart<S>,
        details: &CustomerDetails,
        order_type: OrderType,
    ) -> Result<Receipt, SubmitError> {
        let req = Self::build_request(cart, details, order_type);
        validate_create_order(&req)?;

        let order_id = match self.api.create_order(&req).await {
            Ok(resp) => Some(resp.order_id),
            Err(e) if e.is_transient() => {
                tracing::error!(error = %e, "Failed to relay order to the store");
                None
            }
            Err(e) => return Err(SubmitError::Store(e)),
        };

        let receipt = Receipt {
            order_id,
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            lines: req.items,
            total_cents: req.total_cents,
        };
        cart.clear();
        Ok(receipt)
    }
}
