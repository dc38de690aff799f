//! Statistics aggregation: worker pool, reconciler, and guarded reads.

mod aggregator;
mod delay;
mod result;

pub use aggregator::{StatsAggregator, StatsError};
pub use delay::{DelaySource, FixedDelay, NoDelay, UniformJitter};
pub use result::SharedStats;
