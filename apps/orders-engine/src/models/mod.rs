//! Core domain models for the orders engine.
//!
//! These types define the data structures for products, orders, and the
//! statistics aggregate. They carry no concurrency logic of their own;
//! all mutation is coordinated by the pipeline and stats modules.

mod order;
mod product;
mod stats;

pub use order::{Item, Order, OrderStatus};
pub use product::Product;
pub use stats::Statistics;
