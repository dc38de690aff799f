//! Order pipeline errors.

use thiserror::Error;

use crate::models::OrderStatus;

/// Errors returned from pipeline operations.
///
/// Business rejection (insufficient stock, vanished product) is not an
/// error: it is encoded in the order's `Rejected` status and message, and
/// `submit` still returns the order successfully.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Item failed validation; no order was created.
    #[error("invalid item: {message}")]
    ValidationFailed {
        /// What was wrong with the item.
        message: String,
    },

    /// No order exists for the given id.
    #[error("no order found for id {order_id}")]
    NotFound {
        /// The order id that was looked up.
        order_id: String,
    },

    /// Reversal requested on an order that is not in `Completed` status.
    #[error("order {order_id} is {status}, only completed orders can be reversed")]
    InvalidState {
        /// The order id the reversal targeted.
        order_id: String,
        /// The status the order was actually in.
        status: OrderStatus,
    },

    /// The pipeline has stopped accepting work.
    #[error("the orders pipeline is closed")]
    Closed,
}
