//! Payment API Handlers
//!
//! Initiation either relays the gateway's hosted-bill URL or, with no
//! gateway configured, settles the order immediately and sends the
//! customer to a locally constructed success page (mock mode). The two
//! paths apply the same UNPAID → PAID transition.

use axum::{Form, Json, extract::State};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::order as order_repo;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::client::{InitiatePaymentRequest, InitiatePaymentResponse};

/// POST /api/payment/initiate - Start payment for a created order
///
/// A gateway failure aborts the payment step only: the already-created
/// order stays persisted and UNPAID for manual reconciliation.
pub async fn initiate(
    State(state): State<ServerState>,
    Json(req): Json<InitiatePaymentRequest>,
) -> AppResult<Json<AppResponse<InitiatePaymentResponse>>> {
    let order_id: i64 = req
        .order_id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid order id: {}", req.order_id)))?;

    // The reference must exist before any settlement happens
    let _order = order_repo::find_by_id(&state.pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))?;

    tracing::info!(
        order_id,
        amount_cents = req.amount_cents,
        "Initiating payment"
    );

    if !state.gateway.is_configured() {
        // Mock mode: settle immediately so the flow stays testable
        // without a live gateway
        order_repo::mark_paid(&state.pool, order_id).await?;
        let payment_url = state.gateway.mock_success_url(order_id);
        tracing::warn!(order_id, "Gateway secret not set, order mock-settled");
        return Ok(ok(InitiatePaymentResponse {
            payment_url,
            mock: true,
        }));
    }

    let payment_url = state
        .gateway
        .create_bill(
            order_id,
            req.amount_cents,
            &req.customer_name,
            req.customer_email.as_deref().filter(|e| !e.is_empty()),
            req.customer_phone.as_deref().filter(|p| !p.is_empty()),
        )
        .await
        .map_err(|e| {
            tracing::error!(order_id, error = %e, "Payment initiation failed");
            AppError::gateway("Failed to create bill with payment gateway".to_string())
        })?;

    // Settlement for the live path arrives later through the webhook
    Ok(ok(InitiatePaymentResponse {
        payment_url,
        mock: false,
    }))
}

/// Settlement callback payload (gateway posts x-www-form-urlencoded)
#[derive(Debug, Deserialize)]
pub struct WebhookForm {
    /// Our order id (billExternalReferenceNo)
    pub refno: String,
    /// "1" means settled
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// POST /api/payment/webhook - Asynchronous settlement report
///
/// Always answers 200 "OK" so the gateway stops retrying; failures are
/// logged, never surfaced.
pub async fn webhook(
    State(state): State<ServerState>,
    Form(payload): Form<WebhookForm>,
) -> &'static str {
    tracing::info!(refno = %payload.refno, status = %payload.status, "Payment webhook received");

    if payload.status != "1" {
        tracing::info!(
            refno = %payload.refno,
            reason = payload.reason.as_deref().unwrap_or("unknown"),
            "Payment failed or pending"
        );
        return "OK";
    }

    let Ok(order_id) = payload.refno.parse::<i64>() else {
        tracing::warn!(refno = %payload.refno, "Webhook reference is not an order id");
        return "OK";
    };

    match order_repo::mark_paid(&state.pool, order_id).await {
        Ok(true) => {
            tracing::info!(order_id, "Order marked as PAID via webhook");
        }
        Ok(false) => {
            tracing::warn!(order_id, "Webhook referenced an unknown order");
        }
        Err(e) => {
            tracing::error!(order_id, error = %e, "Database update failed in webhook");
        }
    }

    "OK"
}
