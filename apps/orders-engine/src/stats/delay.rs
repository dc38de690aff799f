//! Injectable delay sources for simulated processing cost.
//!
//! The aggregator's per-order compute and the snapshot read path both
//! incur an artificial delay to model real aggregation cost. Tests plug
//! in [`NoDelay`] for determinism.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

/// A source of artificial processing latency.
#[async_trait]
pub trait DelaySource: Send + Sync {
    /// Suspend the calling task for one sampled delay.
    async fn sleep(&self);
}

/// Uniform random delay in `[0, max)`.
#[derive(Debug, Clone, Copy)]
pub struct UniformJitter {
    max: Duration,
}

impl UniformJitter {
    /// Create a jitter source with the given exclusive upper bound.
    #[must_use]
    pub const fn new(max: Duration) -> Self {
        Self { max }
    }
}

#[async_trait]
impl DelaySource for UniformJitter {
    async fn sleep(&self) {
        let max_millis = self.max.as_millis() as u64;
        if max_millis == 0 {
            return;
        }
        let millis = rand::rng().random_range(0..max_millis);
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

/// Fixed delay on every call.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    duration: Duration,
}

impl FixedDelay {
    /// Create a fixed delay source.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl DelaySource for FixedDelay {
    async fn sleep(&self) {
        tokio::time::sleep(self.duration).await;
    }
}

/// No delay at all. The deterministic choice for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl DelaySource for NoDelay {
    async fn sleep(&self) {}
}
