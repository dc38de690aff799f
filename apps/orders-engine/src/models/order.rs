//! Order lifecycle types.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single requested order line: which product, and how many units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Id of the product being ordered.
    #[serde(rename = "productId")]
    pub product_id: String,
    /// Requested unit count. Must be at least 1 at submission; the
    /// reversal path negates it internally for the stock mutation step.
    pub amount: i64,
}

/// Order status in the lifecycle.
///
/// New orders resolve exactly once to `Completed` or `Rejected`. A
/// completed order may later move through `ReversalRequested` to
/// `Reversed`. `Rejected` and `Reversed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Created, not yet processed by the pipeline owner.
    New,
    /// Fulfilled; stock was decremented and a total was set.
    Completed,
    /// Refused (unknown product or insufficient stock).
    Rejected,
    /// Reversal accepted, awaiting reprocessing with negated amount.
    ReversalRequested,
    /// Reversal fulfilled; stock was restored.
    Reversed,
}

impl OrderStatus {
    /// Returns true if no further automatic transition occurs from this
    /// status without an explicit reversal request.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Reversed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::New => "New",
            Self::Completed => "Completed",
            Self::Rejected => "Rejected",
            Self::ReversalRequested => "ReversalRequested",
            Self::Reversed => "Reversed",
        };
        f.write_str(name)
    }
}

/// A placed order. Identity (`id`) never changes; the order store always
/// holds the latest version addressable by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order id, generated at creation.
    pub id: String,
    /// The requested item.
    pub item: Item,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Order total, set once at fulfillment from `amount * price` and
    /// never recomputed. Stays positive for reversed orders; the
    /// statistics contribution negates it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    /// Rejection message, if the order was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new order for the given item, in status `New`.
    #[must_use]
    pub fn new(item: Item) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            item,
            status: OrderStatus::New,
            total: None,
            error: None,
            created_at: Utc::now(),
        }
    }

    /// Mark the order fulfilled: `Reversed` if it entered processing as a
    /// reversal, `Completed` otherwise.
    pub fn complete(&mut self) {
        if self.status == OrderStatus::ReversalRequested {
            self.status = OrderStatus::Reversed;
        } else {
            self.status = OrderStatus::Completed;
        }
    }

    /// Mark the order rejected with an explanatory message.
    pub fn reject(&mut self, message: impl Into<String>) {
        self.status = OrderStatus::Rejected;
        self.error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_item() -> Item {
        Item {
            product_id: "MWBLU".to_string(),
            amount: 2,
        }
    }

    #[test]
    fn new_order_starts_fresh() {
        let order = Order::new(test_item());
        assert_eq!(order.status, OrderStatus::New);
        assert!(order.total.is_none());
        assert!(order.error.is_none());
        assert!(!order.id.is_empty());
    }

    #[test]
    fn complete_resolves_new_to_completed() {
        let mut order = Order::new(test_item());
        order.complete();
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[test]
    fn complete_resolves_reversal_to_reversed() {
        let mut order = Order::new(test_item());
        order.status = OrderStatus::ReversalRequested;
        order.complete();
        assert_eq!(order.status, OrderStatus::Reversed);
    }

    #[test]
    fn reject_records_message() {
        let mut order = Order::new(test_item());
        order.reject("not enough stock");
        assert_eq!(order.status, OrderStatus::Rejected);
        assert_eq!(order.error.as_deref(), Some("not enough stock"));
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(OrderStatus::Reversed.is_terminal());
        assert!(!OrderStatus::New.is_terminal());
        assert!(!OrderStatus::ReversalRequested.is_terminal());
    }
}
