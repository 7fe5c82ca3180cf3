//! Orders API Handlers
//!
//! Server half of the submission pipeline: the validation gate runs
//! again here (the client already ran it, but nothing stops a direct
//! POST), then the order and its line snapshots are inserted in one
//! transaction. A request that fails validation leaves no trace.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::{AdminUser, KitchenUser};
use crate::core::ServerState;
use crate::db::repository::order as order_repo;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::client::{CreateOrderRequest, CreateOrderResponse, OrderListQuery, UpdateStatusRequest};
use shared::order::Order;
use shared::validate::validate_create_order;

/// POST /api/orders - Create an order (public customer action)
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<Json<AppResponse<CreateOrderResponse>>> {
    // Fails fast: nothing is written when any field is malformed
    validate_create_order(&req)?;

    let new_order = order_repo::NewOrder {
        customer_name: req.customer_name,
        customer_phone: req.customer_phone,
        customer_email: req.customer_email.filter(|e| !e.is_empty()),
        table_number: req.table_number.filter(|t| !t.trim().is_empty()),
        special_request: req.special_request.filter(|r| !r.is_empty()),
        order_type: req.order_type,
        lines: req.items,
        total_cents: req.total_cents,
        created_at: chrono::Utc::now().timestamp_millis(),
    };

    let order_id = order_repo::create(&state.pool, &new_order).await?;

    tracing::info!(
        order_id,
        order_type = %new_order.order_type,
        total_cents = new_order.total_cents,
        "Order created"
    );

    Ok(ok(CreateOrderResponse {
        order_id: order_id.to_string(),
    }))
}

/// GET /api/orders - All orders, optionally bounded to a date range (admin)
pub async fn list_all(
    State(state): State<ServerState>,
    _user: AdminUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let range = query.start.zip(query.end);
    let orders = order_repo::find_all(&state.pool, range).await?;
    Ok(ok(orders))
}

/// GET /api/kitchen/orders - In-flight orders for the kitchen display
/// (kitchen or admin)
pub async fn list_active(
    State(state): State<ServerState>,
    _user: KitchenUser,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = order_repo::find_active(&state.pool).await?;
    Ok(ok(orders))
}

/// PATCH /api/orders/{id}/status - Advance an order (kitchen or admin)
///
/// The repository enforces the forward-only transition gate; an illegal
/// write (backward, or into CANCELLED) is rejected with a validation
/// error and the row is untouched.
pub async fn update_status(
    State(state): State<ServerState>,
    _user: KitchenUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order_id: i64 = id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid order id: {id}")))?;

    let order = order_repo::update_status(&state.pool, order_id, req.status).await?;

    tracing::info!(order_id, status = %order.status, "Order status updated");

    Ok(ok(order))
}

/// DELETE /api/admin/orders - Irreversible bulk clear (admin)
pub async fn clear_all(
    State(state): State<ServerState>,
    _user: AdminUser,
) -> AppResult<Json<AppResponse<bool>>> {
    order_repo::clear_all(&state.pool).await?;
    tracing::warn!("All orders cleared by admin");
    Ok(ok(true))
}
