//! In-memory keyed stores for products and orders.
//!
//! Both stores are safe for concurrent reads. By construction they are
//! mutated only from the order pipeline's owner task; the `RwLock` keeps
//! them sound even if a second mutator ever appears.

mod orders;
mod products;

pub use orders::OrderStore;
pub use products::ProductStore;
