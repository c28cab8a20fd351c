//! Z-score deviation scoring over quadtree regions
//!
//! A region's score is `|mean(region) - global_mean| / global_std_dev`, so
//! both unusually bright and unusually dark regions stand out. Scores are
//! written to a [`ScoreTable`] keyed by node id; the tree itself is never
//! mutated.

use std::time::{Duration, Instant};

use bitvec::prelude::*;

use crate::index::{Rectangle, SummedAreaIndex};
use crate::io::configuration::FLAT_STD_DEV_EPSILON;
use crate::query::ScoredRegion;
use crate::tree::{NodeId, SpatialDecompositionTree};

/// Lifecycle of a scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerState {
    /// No index bound yet
    Unconfigured,
    /// Index bound and global statistics cached
    Initialized,
    /// At least one detection pass has completed
    Scored,
}

/// Deviation scores and anomaly flags indexed by node id
///
/// Produced by [`AnomalyScorer::detect_in_tree`] and read alongside the tree
/// it was computed for. An empty table means no detection pass has run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    scores: Vec<f64>,
    flags: BitVec,
}

impl ScoreTable {
    /// Score of a node, zero for unknown ids
    pub fn score(&self, id: NodeId) -> f64 {
        self.scores.get(id).copied().unwrap_or(0.0)
    }

    /// Check if a node was flagged as anomalous
    pub fn is_flagged(&self, id: NodeId) -> bool {
        self.flags.get(id).as_deref() == Some(&true)
    }

    /// Number of scored nodes
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if no node has been scored
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Number of flagged nodes, leaves and internal alike
    pub fn flagged_count(&self) -> usize {
        self.flags.count_ones()
    }

    /// Check if this table was computed for a tree of the given size
    pub fn covers(&self, tree: &SpatialDecompositionTree) -> bool {
        !self.scores.is_empty() && self.scores.len() == tree.node_count()
    }
}

/// Leaf-level summary of one detection pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnomalyDigest {
    /// Number of leaves scored
    pub scored_leaves: usize,
    /// Number of leaves flagged as anomalous
    pub flagged_leaves: usize,
    /// Lowest leaf score (zero when no leaves)
    pub min_score: f64,
    /// Highest leaf score
    pub max_score: f64,
    /// Mean leaf score
    pub mean_score: f64,
    /// Wall time of the pass
    pub elapsed: Duration,
}

/// Scores regions by their deviation from the global mean
#[derive(Debug, Clone)]
pub struct AnomalyScorer<'a> {
    index: Option<&'a SummedAreaIndex>,
    threshold: f64,
    global_mean: f64,
    global_std_dev: f64,
    scores: ScoreTable,
    digest: AnomalyDigest,
    state: ScorerState,
}

impl<'a> AnomalyScorer<'a> {
    /// Create an unconfigured scorer with the given flagging threshold
    pub fn new(threshold: f64) -> Self {
        Self {
            index: None,
            threshold,
            global_mean: 0.0,
            global_std_dev: 0.0,
            scores: ScoreTable::default(),
            digest: AnomalyDigest::default(),
            state: ScorerState::Unconfigured,
        }
    }

    /// Bind an index and cache its global statistics
    ///
    /// An unbuilt index leaves the scorer unconfigured. Rebinding discards
    /// any previous detection results.
    pub fn initialize(&mut self, index: &'a SummedAreaIndex) {
        self.scores = ScoreTable::default();
        self.digest = AnomalyDigest::default();

        if index.is_built() {
            self.index = Some(index);
            self.global_mean = index.global_mean();
            self.global_std_dev = index.global_std_dev();
            self.state = ScorerState::Initialized;
        } else {
            tracing::warn!("anomaly scorer bound to an unbuilt index");
            self.index = None;
            self.global_mean = 0.0;
            self.global_std_dev = 0.0;
            self.state = ScorerState::Unconfigured;
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> ScorerState {
        self.state
    }

    /// Configured flagging threshold
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Deviation score of an arbitrary rectangle
    ///
    /// Zero when unconfigured or when the grid is flat.
    pub fn compute_score(&self, rect: &Rectangle) -> f64 {
        let Some(index) = self.index else {
            return 0.0;
        };
        if self.global_std_dev < FLAT_STD_DEV_EPSILON {
            return 0.0;
        }
        (index.query_mean(rect) - self.global_mean).abs() / self.global_std_dev
    }

    /// Check if a score is strictly above the threshold
    pub fn exceeds_threshold(&self, score: f64) -> bool {
        score > self.threshold
    }

    /// Check if a rectangle's score is strictly above the threshold
    pub fn is_anomalous(&self, rect: &Rectangle) -> bool {
        self.exceeds_threshold(self.compute_score(rect))
    }

    /// Score and flag every node of `tree`
    ///
    /// Internal nodes are scored too, for pruning, but only leaves enter
    /// the digest. A later pass replaces all earlier results.
    pub fn detect_in_tree(&mut self, tree: &SpatialDecompositionTree) -> AnomalyDigest {
        let start = Instant::now();

        if self.state == ScorerState::Unconfigured {
            tracing::warn!("anomaly detection requested before the scorer was initialized");
            self.scores = ScoreTable::default();
            self.digest = AnomalyDigest::default();
            return self.digest;
        }

        let node_count = tree.node_count();
        let mut scores = Vec::with_capacity(node_count);
        let mut flags = bitvec![0; node_count];

        let mut digest = AnomalyDigest {
            min_score: f64::INFINITY,
            ..AnomalyDigest::default()
        };
        let mut total_score = 0.0;

        for node in tree.nodes() {
            let score = self.compute_score(&node.bounds);
            let flagged = self.exceeds_threshold(score);
            scores.push(score);
            flags.set(node.id, flagged);

            if node.is_leaf() {
                digest.scored_leaves += 1;
                total_score += score;
                digest.min_score = digest.min_score.min(score);
                digest.max_score = digest.max_score.max(score);
                if flagged {
                    digest.flagged_leaves += 1;
                }
            }
        }

        if digest.scored_leaves > 0 {
            digest.mean_score = total_score / digest.scored_leaves as f64;
        } else {
            digest.min_score = 0.0;
        }
        digest.elapsed = start.elapsed();

        tracing::debug!(
            scored_leaves = digest.scored_leaves,
            flagged_leaves = digest.flagged_leaves,
            max_score = digest.max_score,
            threshold = self.threshold,
            "anomaly detection pass complete"
        );

        self.scores = ScoreTable { scores, flags };
        self.digest = digest;
        self.state = ScorerState::Scored;
        digest
    }

    /// Scores from the latest detection pass
    pub const fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    /// Digest from the latest detection pass
    pub const fn digest(&self) -> AnomalyDigest {
        self.digest
    }

    /// Flagged leaves sorted by score, highest first
    ///
    /// Equal scores keep construction order.
    pub fn anomalous_regions(&self, tree: &SpatialDecompositionTree) -> Vec<ScoredRegion> {
        if !self.scores.covers(tree) {
            return Vec::new();
        }

        let mut regions: Vec<ScoredRegion> = tree
            .leaves()
            .filter(|leaf| self.scores.is_flagged(leaf.id))
            .map(|leaf| ScoredRegion::new(leaf.bounds, self.scores.score(leaf.id), leaf.id))
            .collect();

        regions.sort_by(|a, b| b.score.total_cmp(&a.score));
        regions
    }
}
