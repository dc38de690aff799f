//! Worker pool and reconciler for statistics aggregation.
//!
//! ```text
//! pipeline owner ──> mpsc<Order> ──> N workers ──> mpsc<Statistics> ──> reconciler
//!                                  (parallel compute)              (serial fold)
//!                                                                       │
//!                         get_stats ◄── guarded snapshot ◄── SharedStats
//! ```
//!
//! Parallelizing the simulated compute hides its latency while keeping
//! the actual aggregate mutation single-tasked, so `combine` itself needs
//! no locking; only the published result carries a read guard.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::delay::DelaySource;
use super::result::SharedStats;
use crate::models::{Order, OrderStatus, Statistics};

/// Errors from statistics reads.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The caller's deadline elapsed before a snapshot was produced.
    #[error("statistics read timed out")]
    Timeout,
}

/// Asynchronous, eventually-consistent statistics aggregation over the
/// stream of resolved orders.
pub struct StatsAggregator {
    shared: Arc<SharedStats>,
    delay: Arc<dyn DelaySource>,
    tasks: Vec<JoinHandle<()>>,
}

impl StatsAggregator {
    /// Spawn `worker_count` compute workers plus one reconciler consuming
    /// resolved orders from `orders`.
    ///
    /// Shutdown cascades through channel closure: when the sender side of
    /// `orders` drops, the workers drain the remaining orders and exit,
    /// the contribution channel closes, and the reconciler folds what is
    /// left before stopping. Every order already accepted contributes
    /// exactly once; nothing is applied twice.
    #[must_use]
    pub fn spawn(
        worker_count: usize,
        delay: Arc<dyn DelaySource>,
        orders: mpsc::Receiver<Order>,
    ) -> Self {
        let worker_count = worker_count.max(1);
        let shared = Arc::new(SharedStats::new());
        let orders = Arc::new(Mutex::new(orders));
        let (contributions, mut contribution_rx) = mpsc::channel::<Statistics>(worker_count);

        let mut tasks = Vec::with_capacity(worker_count + 1);
        for worker in 0..worker_count {
            let orders = Arc::clone(&orders);
            let contributions = contributions.clone();
            let delay = Arc::clone(&delay);
            tasks.push(tokio::spawn(async move {
                tracing::debug!(worker, "stats worker started");
                loop {
                    // Hold the receiver lock only for the dequeue so other
                    // workers can pull the next order during our compute.
                    let order = orders.lock().await.recv().await;
                    let Some(order) = order else { break };
                    delay.sleep().await;
                    let contribution = contribution(&order);
                    if contributions.send(contribution).await.is_err() {
                        break;
                    }
                }
                tracing::debug!(worker, "stats worker stopped");
            }));
        }
        drop(contributions);

        let aggregate = Arc::clone(&shared);
        tasks.push(tokio::spawn(async move {
            tracing::debug!("stats reconciler started");
            while let Some(contribution) = contribution_rx.recv().await {
                aggregate.combine(contribution);
            }
            tracing::debug!("stats reconciler stopped");
        }));

        Self {
            shared,
            delay,
            tasks,
        }
    }

    /// Read the current aggregate under the caller-supplied deadline.
    ///
    /// The read path incurs the injected delay before taking the guard,
    /// modeling read cost.
    ///
    /// # Errors
    ///
    /// `Timeout` if the deadline elapses before the snapshot is produced,
    /// including a deadline that has already passed.
    pub async fn get_stats(&self, deadline: Instant) -> Result<Statistics, StatsError> {
        if deadline <= Instant::now() {
            return Err(StatsError::Timeout);
        }
        let read = async {
            self.delay.sleep().await;
            self.shared.get()
        };
        tokio::time::timeout_at(deadline, read)
            .await
            .map_err(|_| StatsError::Timeout)
    }

    /// Wait for the workers and reconciler to drain and stop, then return
    /// the final aggregate.
    pub async fn join(self) -> Statistics {
        for task in self.tasks {
            let _ = task.await;
        }
        self.shared.get()
    }
}

/// A single order's incremental effect on the running aggregate.
fn contribution(order: &Order) -> Statistics {
    let total = order.total.unwrap_or_default();
    match order.status {
        OrderStatus::Completed => Statistics {
            completed_orders: 1,
            revenue: total,
            ..Default::default()
        },
        OrderStatus::Reversed => Statistics {
            reversed_orders: 1,
            revenue: -total,
            ..Default::default()
        },
        _ => Statistics {
            rejected_orders: 1,
            ..Default::default()
        },
    }
}
