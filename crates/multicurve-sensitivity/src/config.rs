//! Configuration for portfolio-level aggregation.

use serde::{Deserialize, Serialize};

use crate::traits::CurveSensitivity;

/// Configuration for aggregating many sensitivities.
///
/// Controls parallelism and the tolerance used for economic comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Enable parallel aggregation (requires the `parallel` feature).
    pub parallel: bool,

    /// Minimum number of items to trigger parallel aggregation.
    /// Below this, the sequential fold is faster than spawning work.
    pub parallel_threshold: usize,

    /// Absolute tolerance on values used by [`matches`](Self::matches).
    pub tolerance: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 256,
            tolerance: 1.0e-10,
        }
    }
}

impl AggregationConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always aggregates sequentially.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets whether to use parallel aggregation.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel aggregation.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the comparison tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Returns true if parallel aggregation should be used for `count` items.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }

    /// Economic equality: cleans both sides and compares within `tolerance`.
    #[must_use]
    pub fn matches<S: CurveSensitivity>(&self, lhs: &S, rhs: &S) -> bool {
        lhs.cleaned().approx_eq(&rhs.cleaned(), self.tolerance)
    }
}
