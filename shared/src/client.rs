//! Client-related types shared between server and client
//!
//! Common request/response types used in API communication.
//! These types are shared between order-server and order-client.

use crate::order::{OrderLine, OrderStatus, OrderType};
use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Admin / developer login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Kitchen login request (fixed PIN)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenLoginRequest {
    pub pin: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Role embedded in the token: "admin" | "kitchen" | "developer"
    pub role: String,
}

/// Admin password change request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// =============================================================================
// Order API DTOs
// =============================================================================

/// Order submission payload (public customer action)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    /// Digits only after client-side normalization
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub table_number: Option<String>,
    pub special_request: Option<String>,
    pub order_type: OrderType,
    /// Snapshot lines; the server re-validates the claimed total against these
    pub items: Vec<OrderLine>,
    pub total_cents: i64,
}

/// Order creation result. The server-assigned id is the single displayed
/// identifier, clients never fabricate their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
}

/// Status write sent by the kitchen display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Optional date-range filter on the admin order listing (unix millis)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

// =============================================================================
// Payment API DTOs
// =============================================================================

/// Payment initiation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentRequest {
    pub order_id: String,
    pub amount_cents: i64,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
}

/// Payment initiation response: where to send the customer next
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatePaymentResponse {
    pub payment_url: String,
    /// True when no gateway credential is configured and the order was
    /// mock-settled locally
    #[serde(default)]
    pub mock: bool,
}
