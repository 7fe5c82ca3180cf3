//! Order types
//!
//! The [`Order`] entity plus the fulfillment/payment status machinery.
//! Line items are snapshots taken at creation time; menu edits after the
//! fact never change what an order says it sold.

pub mod types;

pub use types::{OrderStatus, OrderType, PaymentStatus};

use serde::{Deserialize, Serialize};

/// Snapshot of one ordered line: name/quantity/price copied from the menu
/// at creation time, NOT a live reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub name: String,
    pub quantity: i64,
    /// Unit price in cents
    pub price_cents: i64,
}

impl OrderLine {
    /// Line total in cents (unit price × quantity)
    pub fn line_total_cents(&self) -> i64 {
        self.price_cents * self.quantity
    }
}

/// A customer's submitted order, as persisted in the order store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    /// Required for dine-in, absent for take-away
    pub table_number: Option<String>,
    pub special_request: Option<String>,
    pub lines: Vec<OrderLine>,
    /// Invariant: equals the sum of line totals taken at creation time
    pub total_cents: i64,
    /// Unix millis
    pub created_at: i64,
}

impl Order {
    /// Recompute the total from the embedded line snapshots.
    ///
    /// Must always equal `total_cents`; never derived from current menu
    /// prices.
    pub fn computed_total_cents(&self) -> i64 {
        self.lines.iter().map(OrderLine::line_total_cents).sum()
    }

    /// Creation timestamp as an RFC 3339 string (admin listings)
    pub fn created_at_rfc3339(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.created_at)
            .unwrap_or_default()
            .to_rfc3339()
    }
}
