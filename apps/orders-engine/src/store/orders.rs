//! In-memory order store with idempotent upsert.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::models::Order;

/// Keyed container for placed orders. Always holds the latest version of
/// each order, addressable by id.
#[derive(Debug, Default)]
pub struct OrderStore {
    placed: RwLock<HashMap<String, Order>>,
}

impl OrderStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the order with the given id, if one exists.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<Order> {
        self.placed.read().get(id).cloned()
    }

    /// Create or update an order.
    pub fn upsert(&self, order: Order) {
        self.placed.write().insert(order.id.clone(), order);
    }

    /// Number of orders in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placed.read().len()
    }

    /// Returns true if no orders have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed.read().is_empty()
    }
}
