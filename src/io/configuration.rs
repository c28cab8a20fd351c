//! Analysis constants and the explicit per-run configuration value

use crate::io::error::{Result, invalid_parameter};

/// Default edge length at or below which a quadtree region becomes a leaf
pub const DEFAULT_MIN_LEAF_SIZE: usize = 16;

/// Default anomaly threshold, in global standard deviations
pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;

/// Default number of regions returned by top-K queries
pub const DEFAULT_TOP_K: usize = 10;

// Rectangle coordinates are i32, so no grid extent may exceed i32::MAX
/// Maximum allowed grid dimension
pub const MAX_GRID_DIMENSION: usize = i32::MAX as usize;

/// Global standard deviation below which the grid is treated as flat
pub const FLAT_STD_DEV_EPSILON: f64 = 1e-10;

// Synthetic grid settings used by the binary when no input image is given
/// Default edge length of a synthetic grid
pub const DEFAULT_SYNTHETIC_SIZE: usize = 512;
/// Default number of anomalies injected into a synthetic grid
pub const DEFAULT_SYNTHETIC_ANOMALIES: usize = 8;
/// Fixed seed for reproducible synthetic grids
pub const DEFAULT_SEED: u64 = 42;

/// Parameters shared by the tree, scorer, and query stages
///
/// Passed explicitly to each component; nothing here is process-wide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalysisConfig {
    /// Regions with either dimension at or below this size are leaves
    pub min_leaf_size: usize,
    /// Deviation score a region must exceed to be flagged
    pub threshold: f64,
    /// Number of regions returned by top-K queries
    pub top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_leaf_size: DEFAULT_MIN_LEAF_SIZE,
            threshold: DEFAULT_ANOMALY_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl AnalysisConfig {
    /// Check every field against its accepted range
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the leaf size or top-K count is zero,
    /// or the threshold is negative or not finite
    pub fn validate(&self) -> Result<()> {
        if self.min_leaf_size == 0 {
            return Err(invalid_parameter(
                "min_leaf_size",
                &self.min_leaf_size,
                &"must be positive",
            ));
        }
        if self.top_k == 0 {
            return Err(invalid_parameter("top_k", &self.top_k, &"must be positive"));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(invalid_parameter(
                "threshold",
                &self.threshold,
                &"must be a non-negative finite number",
            ));
        }
        Ok(())
    }
}
