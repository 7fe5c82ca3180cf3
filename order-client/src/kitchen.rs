//! Kitchen Sync Service
//!
//! Keeps the kitchen display consistent with the order store over plain
//! polling, with no push channel. Reconciliation policy: server state always
//! wins; every applied poll fully replaces the local ticket list.
//!
//! # Sequence discipline
//!
//! Every poll is stamped with a monotonically increasing sequence number
//! and a response is applied only if no later response has been applied
//! already, so a stale response arriving late can never regress the
//! view. Optimistic local writes (advance, the post-submission insert)
//! carry the server's own identifier scheme, so the next applied poll
//! replaces them exactly instead of duplicating them.

use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, ClientResult};
use crate::http::OrderApi;
use shared::client::CreateOrderRequest;
use shared::order::{Order, OrderStatus, OrderType};

/// Poll interval while a kitchen-facing view is active
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// View model of one order on the kitchen display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitchenTicket {
    /// Stable display identifier (the server id, stringified)
    pub id: String,
    /// Item lines rendered as `"{quantity}x {name}"`
    pub lines: Vec<String>,
    pub status: OrderStatus,
    pub order_type: OrderType,
    pub table_number: Option<String>,
    /// Passed through unmodified
    pub special_request: Option<String>,
}

impl KitchenTicket {
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            lines: order
                .lines
                .iter()
                .map(|l| format!("{}x {}", l.quantity, l.name))
                .collect(),
            status: order.status,
            order_type: order.order_type,
            table_number: order.table_number.clone(),
            special_request: order.special_request.clone(),
        }
    }
}

/// Poll failure, kept until the next successful poll clears it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// 401/403, surfaced without forcing a logout loop
    #[error("Access denied. Please log in again.")]
    AccessDenied,

    /// Network failure or any other non-success response; the next poll
    /// cycle retries implicitly
    #[error("Connection failed. Is the backend running?")]
    ConnectionFailed,
}

/// The kitchen display's sync state
pub struct KitchenSync<A: OrderApi> {
    api: A,
    tickets: Vec<KitchenTicket>,
    last_error: Option<SyncError>,
    /// Sequence stamped onto the next poll
    next_seq: u64,
    /// Sequence of the most recently applied response
    applied_seq: u64,
}

impl<A: OrderApi> KitchenSync<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tickets: Vec::new(),
            last_error: None,
            next_seq: 1,
            applied_seq: 0,
        }
    }

    /// Current view state
    pub fn tickets(&self) -> &[KitchenTicket] {
        &self.tickets
    }

    /// Error from the last applied poll, if any
    pub fn last_error(&self) -> Option<&SyncError> {
        self.last_error.as_ref()
    }

    /// Stamp an outgoing poll
    fn begin_poll(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Apply a poll result unless something newer was applied already.
    ///
    /// Returns the sync outcome, or Ok(()) for a discarded stale
    /// response (the view keeps whatever newer data it has).
    fn apply_poll(
        &mut self,
        seq: u64,
        result: ClientResult<Vec<Order>>,
    ) -> Result<(), SyncError> {
        if seq <= self.applied_seq {
            tracing::debug!(seq, applied = self.applied_seq, "Discarding stale poll response");
            return Ok(());
        }
        self.applied_seq = seq;

        match result {
            Ok(orders) => {
                // Server wins: full replace, no per-field merge
                self.tickets = orders.iter().map(KitchenTicket::from_order).collect();
                self.last_error = None;
                Ok(())
            }
            Err(ClientError::AccessDenied(_)) => {
                self.last_error = Some(SyncError::AccessDenied);
                Err(SyncError::AccessDenied)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Kitchen poll failed");
                self.last_error = Some(SyncError::ConnectionFailed);
                Err(SyncError::ConnectionFailed)
            }
        }
    }

    /// One poll round trip: fetch the active orders and reconcile
    pub async fn poll(&mut self) -> Result<(), SyncError> {
        let seq = self.begin_poll();
        let result = self.api.fetch_active_orders().await;
        self.apply_poll(seq, result)
    }

    /// The staff advance button: NEW → PREPARING → COMPLETED; no-op for
    /// anything else (READY is advanced through an explicit status
    /// write, not this button).
    ///
    /// Applied optimistically to the local view before the network call
    /// resolves; if the write fails the optimistic state stands until
    /// the next poll corrects it (last-poll-wins, deliberately not a
    /// two-phase commit).
    pub async fn advance(&mut self, order_id: &str) -> Option<OrderStatus> {
        let ticket = self.tickets.iter_mut().find(|t| t.id == order_id)?;
        if !matches!(ticket.status, OrderStatus::New | OrderStatus::Preparing) {
            return None;
        }
        let next = ticket.status.advance_target()?;

        // Optimistic: the UI flips immediately
        ticket.status = next;

        if let Err(e) = self.api.update_status(order_id, next).await {
            tracing::warn!(
                order_id,
                error = %e,
                "Status write failed; awaiting poll reconciliation"
            );
        }
        Some(next)
    }

    /// Optimistic insert right after a submission on this device, so the
    /// order shows up before the next poll tick. Carries the
    /// server-assigned id, so the next applied poll replaces it exactly.
    pub fn note_submitted(&mut self, order_id: &str, req: &CreateOrderRequest) {
        let ticket = KitchenTicket {
            id: order_id.to_string(),
            lines: req
                .items
                .iter()
                .map(|l| format!("{}x {}", l.quantity, l.name))
                .collect(),
            status: OrderStatus::New,
            order_type: req.order_type,
            table_number: req.table_number.clone(),
            special_request: req.special_request.clone(),
        };
        match self.tickets.iter_mut().find(|t| t.id == ticket.id) {
            Some(existing) => *existing = ticket,
            None => self.tickets.push(ticket),
        }
    }

    /// Poll on a fixed interval until the token is cancelled (the
    /// kitchen view deactivating tears the loop down). In-flight
    /// results that resolve after cancellation are simply dropped.
    pub async fn run(&mut self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Kitchen polling stopped");
                    break;
                }
                _ = interval.tick() => {
                    // Errors are reflected in last_error; the next tick
                    // retries implicitly
                    let _ = self.poll().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::client::{
        CreateOrderResponse, InitiatePaymentRequest, InitiatePaymentResponse,
    };
    use shared::order::{OrderLine, PaymentStatus};
    use std::sync::Mutex;

    fn order(id: i64, status: OrderStatus) -> Order {
        Order {
            id,
            order_type: OrderType::DineIn,
            status,
            payment_status: PaymentStatus::Unpaid,
            customer_name: "Ali".into(),
            customer_phone: "0123456789".into(),
            customer_email: None,
            table_number: Some("5".into()),
            special_request: Some("less spicy".into()),
            lines: vec![OrderLine {
                name: "Nasi Ayam".into(),
                quantity: 2,
                price_cents: 990,
            }],
            total_cents: 1980,
            created_at: 0,
        }
    }

    /// Scripted order store: serves canned responses and records writes
    #[derive(Default)]
    struct ScriptedApi {
        orders: Mutex<Vec<Order>>,
        status_writes: Mutex<Vec<(String, OrderStatus)>>,
        fail_fetch: Option<fn() -> ClientError>,
        fail_writes: bool,
    }

    impl ScriptedApi {
        fn with_orders(orders: Vec<Order>) -> Self {
            Self {
                orders: Mutex::new(orders),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl OrderApi for ScriptedApi {
        async fn create_order(
            &self,
            _req: &CreateOrderRequest,
        ) -> ClientResult<CreateOrderResponse> {
            unimplemented!("not exercised by sync tests")
        }

        async fn fetch_active_orders(&self) -> ClientResult<Vec<Order>> {
            if let Some(make_err) = self.fail_fetch {
                return Err(make_err());
            }
            Ok(self.orders.lock().unwrap().clone())
        }

        async fn update_status(&self, id: &str, status: OrderStatus) -> ClientResult<Order> {
            if self.fail_writes {
                return Err(ClientError::Api {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            self.status_writes
                .lock()
                .unwrap()
                .push((id.to_string(), status));
            let mut orders = self.orders.lock().unwrap();
            let order = orders
                .iter_mut()
                .find(|o| o.id.to_string() == id)
                .ok_or_else(|| ClientError::NotFound(format!("Order {id}")))?;
            order.status = status;
            Ok(order.clone())
        }

        async fn initiate_payment(
            &self,
            _req: &InitiatePaymentRequest,
        ) -> ClientResult<InitiatePaymentResponse> {
            unimplemented!("not exercised by sync tests")
        }
    }

    #[tokio::test]
    async fn poll_maps_orders_into_view_models() {
        let api = ScriptedApi::with_orders(vec![order(7, OrderStatus::New)]);
        let mut sync = KitchenSync::new(api);

        sync.poll().await.unwrap();

        let tickets = sync.tickets();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].id, "7");
        assert_eq!(tickets[0].lines, vec!["2x Nasi Ayam".to_string()]);
        assert_eq!(tickets[0].special_request.as_deref(), Some("less spicy"));
        assert_eq!(sync.last_error(), None);
    }

    #[tokio::test]
    async fn polling_twice_is_idempotent() {
        let api = ScriptedApi::with_orders(vec![
            order(1, OrderStatus::New),
            order(2, OrderStatus::Preparing),
        ]);
        let mut sync = KitchenSync::new(api);

        sync.poll().await.unwrap();
        let first = sync.tickets().to_vec();

        sync.poll().await.unwrap();
        // No duplication, no drift
        assert_eq!(sync.tickets(), first.as_slice());
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let api = ScriptedApi::with_orders(vec![order(1, OrderStatus::Preparing)]);
        let mut sync = KitchenSync::new(api);

        // Two polls issued; the newer one resolves first
        let old_seq = sync.begin_poll();
        let new_seq = sync.begin_poll();

        sync.apply_poll(new_seq, Ok(vec![order(1, OrderStatus::Preparing)]))
            .unwrap();
        // The stale response carries the order's older status
        sync.apply_poll(old_seq, Ok(vec![order(1, OrderStatus::New)]))
            .unwrap();

        // The view must not regress
        assert_eq!(sync.tickets()[0].status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn advance_is_optimistic_and_two_step() {
        let api = ScriptedApi::with_orders(vec![order(1, OrderStatus::New)]);
        let mut sync = KitchenSync::new(api);
        sync.poll().await.unwrap();

        // NEW -> PREPARING, applied locally before the write resolves
        assert_eq!(sync.advance("1").await, Some(OrderStatus::Preparing));
        assert_eq!(sync.tickets()[0].status, OrderStatus::Preparing);

        // PREPARING -> COMPLETED
        assert_eq!(sync.advance("1").await, Some(OrderStatus::Completed));

        // Third press is a no-op
        assert_eq!(sync.advance("1").await, None);
        assert_eq!(sync.tickets()[0].status, OrderStatus::Completed);

        // The subsequent poll confirms the server applied both writes
        sync.poll().await.unwrap();
        assert_eq!(sync.tickets()[0].status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn advance_ignores_unknown_and_ready_tickets() {
        let api = ScriptedApi::with_orders(vec![order(1, OrderStatus::Ready)]);
        let mut sync = KitchenSync::new(api);
        sync.poll().await.unwrap();

        assert_eq!(sync.advance("1").await, None); // READY: not the button's job
        assert_eq!(sync.advance("99").await, None); // unknown id
        assert!(sync.api.status_writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_write_leaves_optimistic_state_until_poll() {
        let mut api = ScriptedApi::with_orders(vec![order(1, OrderStatus::New)]);
        api.fail_writes = true;
        let mut sync = KitchenSync::new(api);
        sync.poll().await.unwrap();

        sync.advance("1").await;
        // Optimistic flip survives the failed write...
        assert_eq!(sync.tickets()[0].status, OrderStatus::Preparing);

        // ...until the next poll restores the authoritative state
        sync.poll().await.unwrap();
        assert_eq!(sync.tickets()[0].status, OrderStatus::New);
    }

    #[tokio::test]
    async fn access_denied_is_distinguishable_and_clears_on_success() {
        let mut api = ScriptedApi::with_orders(vec![order(1, OrderStatus::New)]);
        api.fail_fetch = Some(|| ClientError::AccessDenied("bad token".into()));
        let mut sync = KitchenSync::new(api);

        assert_eq!(sync.poll().await, Err(SyncError::AccessDenied));
        assert_eq!(sync.last_error(), Some(&SyncError::AccessDenied));

        sync.api.fail_fetch = None;
        sync.poll().await.unwrap();
        assert_eq!(sync.last_error(), None);
    }

    #[tokio::test]
    async fn connection_failure_is_retryable() {
        let mut api = ScriptedApi::with_orders(vec![]);
        api.fail_fetch = Some(|| ClientError::Api {
            status: 500,
            message: "boom".into(),
        });
        let mut sync = KitchenSync::new(api);

        assert_eq!(sync.poll().await, Err(SyncError::ConnectionFailed));
        assert_eq!(sync.last_error(), Some(&SyncError::ConnectionFailed));
    }

    #[tokio::test]
    async fn optimistic_insert_is_replaced_not_duplicated() {
        let api = ScriptedApi::with_orders(vec![order(1, OrderStatus::New)]);
        let mut sync = KitchenSync::new(api);

        // Customer submitted on this device; the server said id=1
        let req = CreateOrderRequest {
            customer_name: "Ali".into(),
            customer_phone: "0123456789".into(),
            customer_email: None,
            table_number: Some("5".into()),
            special_request: None,
            order_type: OrderType::DineIn,
            items: vec![OrderLine {
                name: "Nasi Ayam".into(),
                quantity: 2,
                price_cents: 990,
            }],
            total_cents: 1980,
        };
        sync.note_submitted("1", &req);
        assert_eq!(sync.tickets().len(), 1);
        assert_eq!(sync.tickets()[0].status, OrderStatus::New);

        // The authoritative list supersedes the optimistic entry exactly
        sync.poll().await.unwrap();
        assert_eq!(sync.tickets().len(), 1);
        assert_eq!(sync.tickets()[0].id, "1");
    }
}
