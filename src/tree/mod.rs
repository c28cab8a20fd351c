//! Hierarchical spatial decomposition
//!
//! The quadtree partitions the grid into nested quadrants, caching each
//! region's statistics so later stages never touch the grid again.

/// Flat-arena quadtree and its traversals
pub mod quadtree;

pub use quadtree::{NodeId, SpatialDecompositionTree, TreeNode, TreeSummary, Visit};
