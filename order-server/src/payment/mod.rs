//! Payment Gateway Adapter
//!
//! Wraps the hosted payment gateway's createBill API. When no credential
//! is configured the adapter runs in mock mode: the order is settled
//! immediately and the customer is sent to a locally constructed success
//! URL, so the rest of the system stays testable without a live gateway.

use serde::Deserialize;
use thiserror::Error;

/// Gateway configuration, read from the environment
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Merchant secret; None switches the adapter into mock mode
    pub secret: Option<String>,
    /// Gateway bill category code
    pub category: Option<String>,
    /// Gateway API endpoint
    pub api_url: String,
    /// Where the customer lands after paying
    pub frontend_url: String,
    /// Where the gateway posts settlement webhooks
    pub backend_url: String,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            secret: std::env::var("GATEWAY_SECRET").ok().filter(|s| !s.is_empty()),
            category: std::env::var("GATEWAY_CATEGORY").ok(),
            api_url: std::env::var("GATEWAY_API_URL")
                .unwrap_or_else(|_| "https://dev.toyyibpay.com".into()),
            frontend_url: std::env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            backend_url: std::env::var("BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:4000".into()),
        }
    }
}

/// Gateway failure: the order stays persisted and UNPAID for manual
/// reconciliation; callers surface this as a payment failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("Gateway returned a malformed response")]
    MalformedResponse,
}

/// One element of the gateway's createBill response array
#[derive(Debug, Deserialize)]
struct CreateBillEntry {
    #[serde(rename = "BillCode")]
    bill_code: Option<String>,
}

/// Payment gateway adapter
#[derive(Clone)]
pub struct PaymentGateway {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl PaymentGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Whether a live gateway credential is configured
    pub fn is_configured(&self) -> bool {
        self.config.secret.is_some()
    }

    /// Construct the local success URL used by mock mode
    pub fn mock_success_url(&self, order_id: i64) -> String {
        format!(
            "{}/payment/status?status_id=1&order_id={}&transaction_id=MOCK-{}",
            self.config.frontend_url,
            order_id,
            uuid::Uuid::new_v4()
        )
    }

    /// Create a bill with the live gateway and return the redirect URL.
    ///
    /// Field names follow the gateway's form contract exactly.
    pub async fn create_bill(
        &self,
        order_id: i64,
        amount_cents: i64,
        customer_name: &str,
        customer_email: Option<&str>,
        customer_phone: Option<&str>,
    ) -> Result<String, GatewayError> {
        let secret = self.config.secret.as_deref().unwrap_or_default();
        let category = self.config.category.as_deref().unwrap_or_default();
        let amount = amount_cents.to_string();
        let order_ref = order_id.to_string();
        let bill_name = format!("Order #{order_id}");
        let bill_description = format!("Payment for order {order_id}");
        let return_url = format!("{}/payment/status", self.config.frontend_url);
        let callback_url = format!("{}/api/payment/webhook", self.config.backend_url);

        let params = [
            ("userSecretKey", secret),
            ("categoryCode", category),
            ("billName", bill_name.as_str()),
            ("billDescription", bill_description.as_str()),
            ("billPriceSetting", "1"),
            ("billPayorInfo", "1"),
            ("billAmount", amount.as_str()),
            ("billReturnUrl", return_url.as_str()),
            ("billCallbackUrl", callback_url.as_str()),
            ("billExternalReferenceNo", order_ref.as_str()),
            ("billTo", customer_name),
            ("billEmail", customer_email.unwrap_or("noreply@example.com")),
            ("billPhone", customer_phone.unwrap_or("0123456789")),
        ];

        let response = self
            .http
            .post(format!("{}/index.php/api/createBill", self.config.api_url))
            .form(&params)
            .send()
            .await?;

        let entries: Vec<CreateBillEntry> = response
            .json()
            .await
            .map_err(|_| GatewayError::MalformedResponse)?;

        let bill_code = entries
            .first()
            .and_then(|e| e.bill_code.as_deref())
            .ok_or(GatewayError::MalformedResponse)?;

        Ok(format!("{}/{}", self.config.api_url, bill_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_gateway() -> PaymentGateway {
        PaymentGateway::new(GatewayConfig {
            secret: None,
            category: None,
            api_url: "https://dev.toyyibpay.com".into(),
            frontend_url: "http://localhost:5173".into(),
            backend_url: "http://localhost:4000".into(),
        })
    }

    #[test]
    fn unconfigured_gateway_is_mock_mode() {
        assert!(!mock_gateway().is_configured());
    }

    #[test]
    fn mock_url_points_at_the_frontend_success_page() {
        let url = mock_gateway().mock_success_url(42);
        assert!(url.starts_with("http://localhost:5173/payment/status?status_id=1&order_id=42"));
        assert!(url.contains("transaction_id=MOCK-"));
    }
}
