//! Order pipeline: single-owner serialization of all inventory mutations.
//!
//! Every stock-affecting transition runs on one owner task, so the
//! non-negative-stock invariant needs no per-product locking or
//! compare-and-swap retries. Callers talk to the owner over an mpsc
//! command channel and suspend on a oneshot reply until their order is
//! resolved:
//!
//! ```text
//! submit / request_reversal ──> mpsc::Sender<Command> ──> owner task
//!        ▲                                                    │
//!        └────────────── oneshot reply ◄─────────────────┬────┤
//!                                                        │    ▼
//!                                            OrderStore upsert + stats input
//! ```

mod error;

pub use error::PipelineError;

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::models::{Item, Order, OrderStatus};
use crate::store::{OrderStore, ProductStore};

/// Capacity of the owner's inbound command queue.
const COMMAND_BUFFER: usize = 16;

/// Requests handled by the owner task.
enum Command {
    /// Process a freshly validated order to a terminal status.
    Submit {
        order: Order,
        reply: oneshot::Sender<Order>,
    },
    /// Validate and process a reversal for an existing order.
    ///
    /// The status check runs on the owner task, not the caller task, so
    /// two reversal requests racing for the same order are serialized and
    /// the loser fails with `InvalidState` instead of double-counting.
    Reverse {
        order_id: String,
        reply: oneshot::Sender<Result<Order, PipelineError>>,
    },
}

/// Handle to the order pipeline. Cheap to clone; all clones share the
/// same owner task.
#[derive(Clone)]
pub struct OrderPipeline {
    products: Arc<ProductStore>,
    commands: mpsc::Sender<Command>,
    shutdown: CancellationToken,
}

impl OrderPipeline {
    /// Spawn the owner task and return a handle to it.
    ///
    /// Every order the owner resolves to a terminal status is forwarded
    /// on `processed` for statistics aggregation. The owner stops when
    /// `shutdown` is cancelled and drops `processed`, which cascades the
    /// shutdown to the aggregator.
    #[must_use]
    pub fn spawn(
        products: Arc<ProductStore>,
        orders: Arc<OrderStore>,
        processed: mpsc::Sender<Order>,
        shutdown: CancellationToken,
    ) -> Self {
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let owner = Owner {
            products: Arc::clone(&products),
            orders,
            processed,
        };
        tokio::spawn(owner.run(command_rx, shutdown.clone()));
        Self {
            products,
            commands,
            shutdown,
        }
    }

    /// Submit a new order for the given item.
    ///
    /// Validates the item, then suspends until the owner resolves the
    /// order to `Completed` or `Rejected`. Business rejection is encoded
    /// in the returned order's status, not in the error.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for a non-positive amount or unknown product;
    /// `Closed` if the pipeline shut down before the order resolved (no
    /// order is persisted in that case).
    pub async fn submit(&self, item: Item) -> Result<Order, PipelineError> {
        self.validate(&item)?;
        let order = Order::new(item);
        let (reply, resolved) = oneshot::channel();
        self.commands
            .send(Command::Submit { order, reply })
            .await
            .map_err(|_| PipelineError::Closed)?;
        // A dropped reply means the owner stopped before resolving us.
        resolved.await.map_err(|_| PipelineError::Closed)
    }

    /// Request a reversal of a previously completed order.
    ///
    /// Suspends until the owner restores the stock and resolves the order
    /// to `Reversed`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown order id, `InvalidState` if the order is
    /// not currently `Completed`, `Closed` if the pipeline shut down.
    pub async fn request_reversal(&self, order_id: &str) -> Result<Order, PipelineError> {
        let (reply, resolved) = oneshot::channel();
        self.commands
            .send(Command::Reverse {
                order_id: order_id.to_owned(),
                reply,
            })
            .await
            .map_err(|_| PipelineError::Closed)?;
        resolved.await.map_err(|_| PipelineError::Closed)?
    }

    /// Signal the owner to stop accepting work. Idempotent.
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    /// Returns true if the pipeline has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn validate(&self, item: &Item) -> Result<(), PipelineError> {
        if item.amount < 1 {
            return Err(PipelineError::ValidationFailed {
                message: format!("order amount must be at least 1, got {}", item.amount),
            });
        }
        if !self.products.exists(&item.product_id) {
            return Err(PipelineError::ValidationFailed {
                message: format!("product {} does not exist", item.product_id),
            });
        }
        Ok(())
    }
}

/// The single owner of all stock-affecting mutations.
struct Owner {
    products: Arc<ProductStore>,
    orders: Arc<OrderStore>,
    processed: mpsc::Sender<Order>,
}

impl Owner {
    async fn run(self, mut commands: mpsc::Receiver<Command>, shutdown: CancellationToken) {
        tracing::info!("order pipeline started");
        loop {
            tokio::select! {
                // Check the close signal first so no command queued behind
                // a close is ever processed.
                biased;
                () = shutdown.cancelled() => break,
                command = commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
            }
        }
        tracing::info!("order pipeline stopped");
        // Dropping `self.processed` here closes the stats input; workers
        // drain what was already published and exit.
    }

    async fn handle(&self, command: Command) {
        match command {
            Command::Submit { mut order, reply } => {
                self.orders.upsert(order.clone());
                self.process(&mut order);
                self.orders.upsert(order.clone());
                self.publish(order.clone()).await;
                // The caller may have given up; resolution already stands.
                let _ = reply.send(order);
            }
            Command::Reverse { order_id, reply } => {
                let result = self.reverse(&order_id).await;
                let _ = reply.send(result);
            }
        }
    }

    async fn reverse(&self, order_id: &str) -> Result<Order, PipelineError> {
        let Some(mut order) = self.orders.find(order_id) else {
            return Err(PipelineError::NotFound {
                order_id: order_id.to_owned(),
            });
        };
        if order.status != OrderStatus::Completed {
            return Err(PipelineError::InvalidState {
                order_id: order_id.to_owned(),
                status: order.status,
            });
        }
        order.status = OrderStatus::ReversalRequested;
        self.orders.upsert(order.clone());
        self.process(&mut order);
        self.orders.upsert(order.clone());
        self.publish(order.clone()).await;
        Ok(order)
    }

    /// Resolve one order to a terminal status, mutating stock on success.
    fn process(&self, order: &mut Order) {
        let mut amount = order.item.amount;
        if order.status == OrderStatus::ReversalRequested {
            amount = -amount;
        }
        let Some(mut product) = self.products.find(&order.item.product_id) else {
            order.reject(format!(
                "no product found for id {}",
                order.item.product_id
            ));
            return;
        };
        // Amount is negative for reversals, so this also re-validates
        // reversal feasibility against current stock.
        if product.stock < amount {
            order.reject(format!(
                "not enough stock for product {}: have {}, want {}",
                product.id, product.stock, amount
            ));
            return;
        }
        product.stock -= amount;
        let price = product.price;
        self.products.upsert(product);

        // Total is derived from the original (positive) amount; the
        // statistics contribution negates it for reversals.
        let total = (Decimal::from(order.item.amount) * price).round_dp(2);
        order.total = Some(total);
        order.complete();
        tracing::debug!(
            order_id = %order.id,
            status = %order.status,
            %total,
            "order resolved"
        );
    }

    async fn publish(&self, order: Order) {
        if self.processed.send(order).await.is_err() {
            tracing::warn!("stats input closed, dropping contribution");
        }
    }
}
