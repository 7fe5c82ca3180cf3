//! Order status state machine
//!
//! 订单状态分两条独立的轴：
//! - 厨房进度 [`OrderStatus`]: NEW → PREPARING → READY → COMPLETED
//! - 支付状态 [`PaymentStatus`]: UNPAID → PAID
//!
//! 两条轴互不影响 — 厨房推进订单不会改变支付状态，反之亦然。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fulfillment channel chosen by the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum OrderType {
    DineIn,
    TakeAway,
}

impl OrderType {
    /// Dine-in orders must carry a table number
    pub fn requires_table(self) -> bool {
        matches!(self, OrderType::DineIn)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::DineIn => write!(f, "dine-in"),
            OrderType::TakeAway => write!(f, "take-away"),
        }
    }
}

/// Kitchen-facing progress marker.
///
/// CANCELLED is modeled but unreachable: no operation in the system
/// produces it, and the forward-transition gate rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum OrderStatus {
    New,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Target of the staff advance button.
    ///
    /// The two-step protocol used on the kitchen display: NEW → PREPARING
    /// → COMPLETED. READY is skipped by the button but stays addressable
    /// (READY → COMPLETED) for flows that set it explicitly.
    pub fn advance_target(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::New => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Completed),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    /// Whether a status write through the staff interface is allowed.
    ///
    /// Forward-only along NEW → PREPARING → READY → COMPLETED with the
    /// PREPARING → COMPLETED shortcut. Backward movement would need a
    /// separate administrative operation, which does not exist.
    pub fn accepts_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (New, Preparing) | (Preparing, Ready) | (Preparing, Completed) | (Ready, Completed)
        )
    }

    /// Terminal for the advance protocol
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// In-flight from the kitchen's point of view
    pub fn is_active(self) -> bool {
        matches!(
            self,
            OrderStatus::New | OrderStatus::Preparing | OrderStatus::Ready
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::New => "NEW",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Whether money has been confirmed received. Orthogonal to [`OrderStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

impl PaymentStatus {
    /// The only UNPAID → PAID path: gateway settlement or the mock-payment
    /// fallback. PAID is absorbing.
    pub fn settle(self) -> PaymentStatus {
        PaymentStatus::Paid
    }

    pub fn is_settled(self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "UNPAID"),
            PaymentStatus::Paid => write!(f, "PAID"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_two_step_and_monotonic() {
        let first = OrderStatus::New.advance_target().unwrap();
        assert_eq!(first, OrderStatus::Preparing);

        let second = first.advance_target().unwrap();
        assert_eq!(second, OrderStatus::Completed);

        // Third press is a no-op: COMPLETED is terminal for the button
        assert_eq!(second.advance_target(), None);
    }

    #[test]
    fn ready_stays_addressable() {
        assert_eq!(
            OrderStatus::Ready.advance_target(),
            Some(OrderStatus::Completed)
        );
        assert!(OrderStatus::Preparing.accepts_transition_to(OrderStatus::Ready));
    }

    #[test]
    fn no_backward_transitions() {
        assert!(!OrderStatus::Preparing.accepts_transition_to(OrderStatus::New));
        assert!(!OrderStatus::Completed.accepts_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Completed.accepts_transition_to(OrderStatus::New));
        assert!(!OrderStatus::Ready.accepts_transition_to(OrderStatus::Preparing));
    }

    #[test]
    fn cancelled_is_unreachable_through_the_gate() {
        for from in [
            OrderStatus::New,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
        ] {
            assert!(!from.accepts_transition_to(OrderStatus::Cancelled));
        }
        assert_eq!(OrderStatus::Cancelled.advance_target(), None);
    }

    #[test]
    fn payment_is_orthogonal() {
        // Advancing fulfillment never touches payment and vice versa:
        // the types don't even reference each other. Settling is absorbing.
        let p = PaymentStatus::Unpaid.settle();
        assert_eq!(p, PaymentStatus::Paid);
        assert_eq!(p.settle(), PaymentStatus::Paid);
        assert!(!PaymentStatus::Unpaid.is_settled());
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Preparing).unwrap(),
            "\"PREPARING\""
        );
        assert_eq!(
            serde_json::to_string(&OrderType::TakeAway).unwrap(),
            "\"take-away\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Unpaid).unwrap(),
            "\"UNPAID\""
        );
        let s: OrderStatus = serde_json::from_str("\"NEW\"").unwrap();
        assert_eq!(s, OrderStatus::New);
    }
}
