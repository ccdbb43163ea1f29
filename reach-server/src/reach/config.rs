//! Analysis configuration.

use crate::domain::MAX_RADIUS_M;

/// Configuration parameters for reachability analysis.
#[derive(Debug, Clone)]
pub struct ReachConfig {
    /// Maximum number of provider calls issued concurrently per batch.
    /// Applies to timetable fetches and stop detail lookups.
    pub batch_size: usize,

    /// Largest accepted search radius (meters).
    pub max_radius_m: u32,
}

impl ReachConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(batch_size: usize, max_radius_m: u32) -> Self {
        Self {
            batch_size,
            max_radius_m,
        }
    }

    /// Set the batch size for concurrent provider calls.
    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    /// Set the largest accepted search radius.
    pub fn with_max_radius(mut self, meters: u32) -> Self {
        self.max_radius_m = meters;
        self
    }
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self {
            batch_size: 8,
            max_radius_m: MAX_RADIUS_M,
        }
    }
}
