//! Engine facade wiring the stores, pipeline, and aggregator together.
//!
//! This is the surface an outer transport (HTTP, RPC, CLI) adapts; the
//! engine itself defines no wire format.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::models::{Item, Order, Product, Statistics};
use crate::pipeline::{OrderPipeline, PipelineError};
use crate::stats::{DelaySource, StatsAggregator, StatsError};
use crate::store::{OrderStore, ProductStore};

/// The order-processing engine.
pub struct Engine {
    products: Arc<ProductStore>,
    orders: Arc<OrderStore>,
    pipeline: OrderPipeline,
    stats: StatsAggregator,
}

impl Engine {
    /// Build an engine over the given catalog, with the delay source
    /// implied by the config.
    #[must_use]
    pub fn new(config: &EngineConfig, catalog: impl IntoIterator<Item = Product>) -> Self {
        Self::with_delay(config, catalog, config.delay_source())
    }

    /// Build an engine with an explicit delay source (tests inject
    /// `NoDelay` here for determinism).
    #[must_use]
    pub fn with_delay(
        config: &EngineConfig,
        catalog: impl IntoIterator<Item = Product>,
        delay: Arc<dyn DelaySource>,
    ) -> Self {
        let worker_count = config.worker_count.max(1);
        let products = Arc::new(ProductStore::with_products(catalog));
        let orders = Arc::new(OrderStore::new());
        let (processed_tx, processed_rx) = mpsc::channel(worker_count);
        let shutdown = CancellationToken::new();

        let pipeline = OrderPipeline::spawn(
            Arc::clone(&products),
            Arc::clone(&orders),
            processed_tx,
            shutdown,
        );
        let stats = StatsAggregator::spawn(worker_count, delay, processed_rx);

        Self {
            products,
            orders,
            pipeline,
            stats,
        }
    }

    /// Submit a new order. See [`OrderPipeline::submit`].
    pub async fn submit(&self, item: Item) -> Result<Order, PipelineError> {
        self.pipeline.submit(item).await
    }

    /// Request reversal of a completed order.
    /// See [`OrderPipeline::request_reversal`].
    pub async fn request_reversal(&self, order_id: &str) -> Result<Order, PipelineError> {
        self.pipeline.request_reversal(order_id).await
    }

    /// Look up an order by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if no order with that id was ever created.
    pub fn find_order(&self, order_id: &str) -> Result<Order, PipelineError> {
        self.orders
            .find(order_id)
            .ok_or_else(|| PipelineError::NotFound {
                order_id: order_id.to_owned(),
            })
    }

    /// All products, sorted by id.
    #[must_use]
    pub fn find_all_products(&self) -> Vec<Product> {
        self.products.find_all()
    }

    /// Point-in-time read of the statistics aggregate under the given
    /// deadline. See [`StatsAggregator::get_stats`].
    pub async fn get_stats(&self, deadline: Instant) -> Result<Statistics, StatsError> {
        self.stats.get_stats(deadline).await
    }

    /// Stop accepting new work. Idempotent; already-accepted orders
    /// still drain through the aggregator.
    pub fn close(&self) {
        self.pipeline.close();
    }

    /// Returns true if the engine has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pipeline.is_closed()
    }

    /// Close the engine, wait for the aggregator to drain, and return
    /// the final statistics.
    pub async fn join(self) -> Statistics {
        self.pipeline.close();
        self.stats.join().await
    }
}
