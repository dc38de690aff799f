//! Product catalog entry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product held in inventory.
///
/// Stock and price are mutated only by the order pipeline's owner task;
/// everything else reads a point-in-time copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product id (catalog key).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit price. Never negative.
    pub price: Decimal,
    /// Units currently in stock. Never negative.
    pub stock: i64,
}
