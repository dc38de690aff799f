//! Engine configuration.
//!
//! Loaded from environment variables:
//!
//! - `ORDERS_STATS_WORKERS`: stats worker pool size (default: 3)
//! - `ORDERS_MAX_DELAY_MS`: upper bound of the simulated processing
//!   jitter in milliseconds (default: 500; 0 disables the delay)

use std::sync::Arc;
use std::time::Duration;

use crate::stats::{DelaySource, NoDelay, UniformJitter};

/// Default stats worker pool size.
pub const DEFAULT_WORKER_COUNT: usize = 3;

/// Default upper bound for simulated processing jitter.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(500);

/// Tunable engine parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Number of stats workers computing contributions in parallel.
    pub worker_count: usize,
    /// Upper bound of the simulated per-order compute and read delay.
    pub max_simulated_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            max_simulated_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl EngineConfig {
    /// Build a config from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let worker_count = env_parse("ORDERS_STATS_WORKERS", DEFAULT_WORKER_COUNT).max(1);
        let max_delay_ms = env_parse(
            "ORDERS_MAX_DELAY_MS",
            DEFAULT_MAX_DELAY.as_millis() as u64,
        );
        Self {
            worker_count,
            max_simulated_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// The delay source implied by this config: uniform jitter, or no
    /// delay at all when the bound is zero.
    #[must_use]
    pub fn delay_source(&self) -> Arc<dyn DelaySource> {
        if self.max_simulated_delay.is_zero() {
            Arc::new(NoDelay)
        } else {
            Arc::new(UniformJitter::new(self.max_simulated_delay))
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
