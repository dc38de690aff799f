//! Shared running aggregate with a guarded read side.

use parking_lot::Mutex;

use crate::models::Statistics;

/// The running statistics total.
///
/// Written only by the reconciler task; read concurrently by arbitrarily
/// many snapshot readers. The mutex holds just long enough to copy the
/// value, so reads are atomic snapshots and never torn.
#[derive(Debug, Default)]
pub struct SharedStats {
    latest: Mutex<Statistics>,
}

impl SharedStats {
    /// Create a zeroed aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a point-in-time snapshot of the aggregate.
    #[must_use]
    pub fn get(&self) -> Statistics {
        *self.latest.lock()
    }

    /// Fold a contribution into the aggregate.
    pub fn combine(&self, contribution: Statistics) {
        let mut latest = self.latest.lock();
        *latest = latest.combine(contribution);
    }
}
