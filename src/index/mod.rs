//! Constant-time rectangle statistics over the source grid
//!
//! This module contains:
//! - Inclusive-bound rectangles and derived region statistics
//! - The summed-area index with its padded prefix tables

/// Rectangles and region statistics
pub mod region;
/// Summed-area tables and inclusion-exclusion queries
pub mod summed_area;

pub use region::{Rectangle, RegionStatistics};
pub use summed_area::SummedAreaIndex;
