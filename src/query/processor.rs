//! Read-only queries over a scored quadtree
//!
//! All queries degrade to an empty result when the tree is unbuilt or the
//! score table does not belong to it, so callers in a loop never have to
//! handle per-query errors.

use std::time::Instant;

use crate::index::{Rectangle, RegionStatistics, SummedAreaIndex};
use crate::io::error::{AnalysisError, Result};
use crate::query::connectivity::{
    ConnectedComponent, components_depth_first, components_union_find,
};
use crate::query::selection::{BoundedTopK, RankedResult, ScoredRegion};
use crate::scoring::ScoreTable;
use crate::tree::{SpatialDecompositionTree, TreeNode, Visit};

/// Query front end over an index, its tree, and the tree's scores
#[derive(Debug, Clone, Copy)]
pub struct QueryProcessor<'a> {
    tree: &'a SpatialDecompositionTree,
    scores: &'a ScoreTable,
    index: &'a SummedAreaIndex,
}

impl<'a> QueryProcessor<'a> {
    /// Create a processor without checking readiness
    ///
    /// Queries on an unready processor return empty results.
    pub const fn new(
        tree: &'a SpatialDecompositionTree,
        scores: &'a ScoreTable,
        index: &'a SummedAreaIndex,
    ) -> Self {
        Self {
            tree,
            scores,
            index,
        }
    }

    /// Create a processor, failing if any predecessor stage is missing
    ///
    /// # Errors
    ///
    /// Returns `Uninitialized` if the index or tree is unbuilt, or if the
    /// scores were not computed for this tree
    pub fn checked(
        tree: &'a SpatialDecompositionTree,
        scores: &'a ScoreTable,
        index: &'a SummedAreaIndex,
    ) -> Result<Self> {
        if !index.is_built() {
            return Err(AnalysisError::Uninitialized {
                stage: "query processor",
                requires: "summed-area index",
            });
        }
        if !tree.is_built() {
            return Err(AnalysisError::Uninitialized {
                stage: "query processor",
                requires: "spatial decomposition tree",
            });
        }
        if !scores.covers(tree) {
            return Err(AnalysisError::Uninitialized {
                stage: "query processor",
                requires: "anomaly scores",
            });
        }
        Ok(Self::new(tree, scores, index))
    }

    /// Check if queries will produce results
    pub fn is_ready(&self) -> bool {
        self.tree.is_built() && self.scores.covers(self.tree)
    }

    /// The `k` highest-scoring nodes, optionally restricted to leaves
    ///
    /// Scans every candidate once through a bounded min-heap, `O(n log k)`.
    pub fn top_k(&self, k: usize, leaf_only: bool) -> RankedResult {
        let start = Instant::now();
        let mut result = RankedResult::default();
        if !self.is_ready() || k == 0 {
            return result;
        }

        let mut selector = BoundedTopK::new(k);
        for node in self.tree.nodes() {
            if leaf_only && !node.is_leaf() {
                continue;
            }
            result.nodes_visited += 1;
            selector.offer(self.scored(node));
        }

        result.regions = selector.into_sorted_desc();
        result.elapsed = start.elapsed();
        result
    }

    /// Top-K leaves with branch-and-bound subtree pruning
    ///
    /// Once `k` leaves are held, an internal node scoring below the held
    /// minimum has its whole subtree skipped. This treats the node's own
    /// score as an upper bound on its descendants' scores, which the data
    /// does not guarantee: a coarse mean can hide a sharp sub-region, so
    /// results may differ from [`Self::top_k`] with `leaf_only`.
    pub fn top_k_with_pruning(&self, k: usize) -> RankedResult {
        let start = Instant::now();
        let mut result = RankedResult::default();
        if !self.is_ready() || k == 0 {
            return result;
        }

        let mut selector = BoundedTopK::new(k);
        self.tree.traverse(|node| {
            result.nodes_visited += 1;
            let score = self.scores.score(node.id);

            if node.is_leaf() {
                selector.offer(self.scored(node));
                return Visit::Descend;
            }

            let below_floor = selector.is_full()
                && selector.min_score().is_some_and(|floor| score < floor);
            if below_floor {
                result.nodes_pruned += 1;
                Visit::SkipChildren
            } else {
                Visit::Descend
            }
        });

        tracing::debug!(
            k,
            visited = result.nodes_visited,
            pruned = result.nodes_pruned,
            "pruned top-k complete"
        );

        result.regions = selector.into_sorted_desc();
        result.elapsed = start.elapsed();
        result
    }

    /// Anomalous leaves intersecting `query`, highest score first
    pub fn query_rectangle(&self, query: &Rectangle) -> RankedResult {
        let start = Instant::now();
        let mut result = RankedResult::default();
        if !self.is_ready() {
            return result;
        }

        for leaf in self.tree.query_intersecting(query) {
            result.nodes_visited += 1;
            if self.scores.is_flagged(leaf.id) {
                result.regions.push(self.scored(leaf));
            }
        }

        result
            .regions
            .sort_by(|a, b| b.score.total_cmp(&a.score));
        result.elapsed = start.elapsed();
        result
    }

    /// Statistics of an arbitrary rectangle, straight from the index
    pub fn region_statistics(&self, rect: &Rectangle) -> RegionStatistics {
        self.index.query_statistics(rect)
    }

    /// Connected groups of anomalous leaves via union-find, largest first
    pub fn find_connected_components(&self) -> Vec<ConnectedComponent> {
        components_union_find(&self.anomalous_leaves())
    }

    /// Connected groups of anomalous leaves via depth-first search
    ///
    /// Produces the same grouping as [`Self::find_connected_components`].
    pub fn find_connected_components_dfs(&self) -> Vec<ConnectedComponent> {
        components_depth_first(&self.anomalous_leaves())
    }

    /// Component with the largest total area, if any leaf is anomalous
    pub fn largest_component(&self) -> Option<ConnectedComponent> {
        self.find_connected_components().into_iter().next()
    }

    /// Number of anomalous leaves
    pub fn count_anomalous_regions(&self) -> usize {
        if !self.is_ready() {
            return 0;
        }
        self.tree
            .leaves()
            .filter(|leaf| self.scores.is_flagged(leaf.id))
            .count()
    }

    /// Total area covered by anomalous leaves
    pub fn total_anomalous_area(&self) -> i64 {
        if !self.is_ready() {
            return 0;
        }
        self.tree
            .leaves()
            .filter(|leaf| self.scores.is_flagged(leaf.id))
            .map(|leaf| leaf.bounds.area())
            .sum()
    }

    // Flagged leaves in construction order
    fn anomalous_leaves(&self) -> Vec<ScoredRegion> {
        if !self.is_ready() {
            return Vec::new();
        }
        self.tree
            .leaves()
            .filter(|leaf| self.scores.is_flagged(leaf.id))
            .map(|leaf| self.scored(leaf))
            .collect()
    }

    fn scored(&self, node: &TreeNode) -> ScoredRegion {
        ScoredRegion::new(node.bounds, self.scores.score(node.id), node.id)
    }
}
