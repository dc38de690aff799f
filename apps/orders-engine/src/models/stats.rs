//! The statistics aggregate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Running order statistics.
///
/// A commutative, associative monoid under [`Statistics::combine`] with
/// the all-zero value as identity, so worker contributions can be folded
/// in any arrival order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Count of completed orders.
    pub completed_orders: u64,
    /// Count of rejected orders.
    pub rejected_orders: u64,
    /// Count of reversed orders.
    pub reversed_orders: u64,
    /// Net revenue. Reversals contribute negatively.
    pub revenue: Decimal,
}

impl Statistics {
    /// Fold another statistics value into this one.
    ///
    /// Counters add field-wise; revenue is rounded to 2 decimal places
    /// after the summation rather than per term.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            completed_orders: self.completed_orders + other.completed_orders,
            rejected_orders: self.rejected_orders + other.rejected_orders,
            reversed_orders: self.reversed_orders + other.reversed_orders,
            revenue: (self.revenue + other.revenue).round_dp(2),
        }
    }
}
