//! Order Repository
//!
//! The order store is the only shared mutable resource in the system;
//! every mutation goes through an explicit operation here (create, status
//! update, settle, bulk clear). SQLite's WAL + busy_timeout discipline
//! serializes concurrent writers.

use super::{RepoError, RepoResult};
use shared::order::{Order, OrderLine, OrderStatus, OrderType, PaymentStatus};
use sqlx::SqlitePool;

/// Payload for a validated order insert. The caller has already run the
/// validation gate; `total_cents` equals the sum of the line snapshots.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub table_number: Option<String>,
    pub special_request: Option<String>,
    pub order_type: OrderType,
    pub lines: Vec<OrderLine>,
    pub total_cents: i64,
    pub created_at: i64,
}

/// Row shape of the orders table (lines attached separately)
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    customer_phone: String,
    customer_email: Option<String>,
    table_number: Option<String>,
    special_request: Option<String>,
    order_type: OrderType,
    total_cents: i64,
    status: OrderStatus,
    payment_status: PaymentStatus,
    created_at: i64,
}

const ORDER_COLUMNS: &str = "id, customer_name, customer_phone, customer_email, table_number, \
     special_request, order_type, total_cents, status, payment_status, created_at";

/// Insert one order plus its line snapshots atomically.
///
/// Both the order row and all item rows land in one transaction; a
/// failure partway leaves nothing behind.
pub async fn create(pool: &SqlitePool, new: &NewOrder) -> RepoResult<i64> {
    let mut tx = pool.begin().await?;

    let order_id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (customer_name, customer_phone, customer_email, table_number, \
         special_request, order_type, total_cents, status, payment_status, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, 'NEW', 'UNPAID', ?) RETURNING id",
    )
    .bind(&new.customer_name)
    .bind(&new.customer_phone)
    .bind(&new.customer_email)
    .bind(&new.table_number)
    .bind(&new.special_request)
    .bind(new.order_type)
    .bind(new.total_cents)
    .bind(new.created_at)
    .fetch_one(&mut *tx)
    .await?;

    for line in &new.lines {
        sqlx::query(
            "INSERT INTO order_items (order_id, name, quantity, price_cents) VALUES (?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(&line.name)
        .bind(line.quantity)
        .bind(line.price_cents)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(order_id)
}

/// All orders, newest first, optionally bounded to a creation-time range
/// (admin view, includes every historical status).
pub async fn find_all(pool: &SqlitePool, range: Option<(i64, i64)>) -> RepoResult<Vec<Order>> {
    let rows: Vec<OrderRow> = match range {
        Some((start, end)) => {
            sqlx::query_as(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders \
                 WHERE created_at >= ? AND created_at <= ? ORDER BY created_at DESC"
            ))
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
            ))
            .fetch_all(pool)
            .await?
        }
    };
    attach_lines(pool, rows).await
}

/// Orders the kitchen display cares about, oldest first.
///
/// The filter deliberately includes COMPLETED so staff briefly see
/// just-finished orders without a second fetch round.
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let rows: Vec<OrderRow> = sqlx::query_as(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders \
         WHERE status IN ('NEW', 'PREPARING', 'READY', 'COMPLETED') ORDER BY created_at ASC"
    ))
    .fetch_all(pool)
    .await?;
    attach_lines(pool, rows).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row: Option<OrderRow> =
        sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    Ok(attach_lines(pool, vec![row]).await?.into_iter().next())
}

/// Apply a fulfillment status transition through the forward-only gate.
///
/// The UPDATE is conditional on the status still being what we read, so
/// two devices advancing the same order concurrently cannot double-apply;
/// the loser gets a Conflict and its next poll corrects the view.
pub async fn update_status(pool: &SqlitePool, id: i64, next: OrderStatus) -> RepoResult<Order> {
    let current: Option<OrderStatus> = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let current = current.ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))?;

    if !current.accepts_transition_to(next) {
        return Err(RepoError::Validation(format!(
            "Illegal status transition {current} -> {next}"
        )));
    }

    let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
        .bind(next)
        .bind(id)
        .bind(current)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::Conflict(format!(
            "Order {id} was updated concurrently"
        )));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Settle payment for an order. Touches only the payment axis; the
/// fulfillment status is never read or written here.
///
/// Returns false when the id does not exist (webhook reference guard).
pub async fn mark_paid(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("UPDATE orders SET payment_status = 'PAID' WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Irreversible administrative bulk clear.
///
/// Deletes items and orders and resets the autoincrement counters in one
/// transaction. The explicit sequence reset is the only way ids are ever
/// reused.
pub async fn clear_all(pool: &SqlitePool) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM order_items").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM orders").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM sqlite_sequence WHERE name IN ('orders', 'order_items')")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Load the snapshot lines for each order row
async fn attach_lines(pool: &SqlitePool, rows: Vec<OrderRow>) -> RepoResult<Vec<Order>> {
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let lines: Vec<OrderLine> = sqlx::query_as(
            "SELECT name, quantity, price_cents FROM order_items WHERE order_id = ? ORDER BY id",
        )
        .bind(row.id)
        .fetch_all(pool)
        .await?;

        orders.push(Order {
            id: row.id,
            order_type: row.order_type,
            status: row.status,
            payment_status: row.payment_status,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_email: row.customer_email,
            table_number: row.table_number,
            special_request: row.special_request,
            lines,
            total_cents: row.total_cents,
            created_at: row.created_at,
        });
    }
    Ok(orders)
}
