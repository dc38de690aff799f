// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Orders Engine - In-Memory Order Processing Core
//!
//! An order-processing pipeline with asynchronous, eventually-consistent
//! statistics aggregation.
//!
//! # Architecture
//!
//! ```text
//! submit / request_reversal
//!        │
//!        ▼
//! OrderPipeline owner ──────► ProductStore / OrderStore (single writer)
//!        │
//!        ▼ resolved orders
//! StatsAggregator workers (parallel simulated compute)
//!        │
//!        ▼ contributions
//! Reconciler (serial fold) ──► SharedStats ◄── get_stats (guarded read)
//! ```
//!
//! Two serialization points carry all shared-state mutation: the pipeline
//! owner task (inventory and order records) and the stats reconciler (the
//! running aggregate). Everything else communicates over channels.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Product catalog CSV import.
pub mod catalog;

/// Engine configuration from environment variables.
pub mod config;

/// Facade wiring stores, pipeline, and aggregator together.
pub mod engine;

/// Core domain models.
pub mod models;

/// Single-owner order processing.
pub mod pipeline;

/// Worker-pool statistics aggregation.
pub mod stats;

/// In-memory keyed stores.
pub mod store;

/// Tracing setup.
pub mod telemetry;

pub use catalog::{CatalogError, load_products};
pub use config::EngineConfig;
pub use engine::Engine;
pub use models::{Item, Order, OrderStatus, Product, Statistics};
pub use pipeline::{OrderPipeline, PipelineError};
pub use stats::{DelaySource, FixedDelay, NoDelay, StatsAggregator, StatsError, UniformJitter};
pub use store::{OrderStore, ProductStore};
