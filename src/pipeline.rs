//! End-to-end orchestration: grid, index, tree, scores, queries
//!
//! Each stage is built strictly after its predecessor. The report owns all
//! of its data so callers need not keep the intermediate stages alive.

use std::time::{Duration, Instant};

use ndarray::ArrayView2;

use crate::index::{RegionStatistics, SummedAreaIndex};
use crate::io::configuration::AnalysisConfig;
use crate::io::error::Result;
use crate::query::{ConnectedComponent, QueryProcessor, RankedResult, ScoredRegion};
use crate::scoring::{AnomalyDigest, AnomalyScorer};
use crate::tree::{SpatialDecompositionTree, TreeSummary};

/// Wall time spent in each stage
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    /// Summed-area index construction
    pub index: Duration,
    /// Quadtree construction
    pub tree: Duration,
    /// Deviation scoring
    pub scoring: Duration,
    /// All queries combined
    pub queries: Duration,
}

/// Everything one analysis run produces
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Grid dimensions (rows, cols)
    pub dimensions: (usize, usize),
    /// Whole-grid statistics
    pub global: RegionStatistics,
    /// Shape of the decomposition
    pub tree: TreeSummary,
    /// Leaf-level scoring summary
    pub digest: AnomalyDigest,
    /// Every anomalous leaf, highest score first
    pub anomalies: Vec<ScoredRegion>,
    /// Exhaustive top-K over leaves
    pub top_k: RankedResult,
    /// Top-K with subtree pruning
    pub top_k_pruned: RankedResult,
    /// Connected anomalous regions, largest first
    pub components: Vec<ConnectedComponent>,
    /// Area covered by anomalous leaves
    pub anomalous_area: i64,
    /// Per-stage timings
    pub timings: StageTimings,
}

/// Runs the full analysis with one explicit configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisPipeline {
    config: AnalysisConfig,
}

impl AnalysisPipeline {
    /// Create a pipeline with the given configuration
    pub const fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Configuration used for every stage
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one grid
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the grid is
    /// empty; later stages never fail once the index is built
    pub fn run(&self, grid: ArrayView2<'_, u8>) -> Result<AnalysisReport> {
        self.config.validate()?;
        let mut timings = StageTimings::default();

        let stage = Instant::now();
        let index = SummedAreaIndex::build(grid)?;
        timings.index = stage.elapsed();

        let stage = Instant::now();
        let tree = SpatialDecompositionTree::build(&index, self.config.min_leaf_size)?;
        timings.tree = stage.elapsed();

        let stage = Instant::now();
        let mut scorer = AnomalyScorer::new(self.config.threshold);
        scorer.initialize(&index);
        let digest = scorer.detect_in_tree(&tree);
        let anomalies = scorer.anomalous_regions(&tree);
        timings.scoring = stage.elapsed();

        let stage = Instant::now();
        let processor = QueryProcessor::checked(&tree, scorer.scores(), &index)?;
        let top_k = processor.top_k(self.config.top_k, true);
        let top_k_pruned = processor.top_k_with_pruning(self.config.top_k);
        let components = processor.find_connected_components();
        let anomalous_area = processor.total_anomalous_area();
        timings.queries = stage.elapsed();

        tracing::info!(
            rows = index.rows(),
            cols = index.cols(),
            nodes = tree.node_count(),
            anomalies = anomalies.len(),
            components = components.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            dimensions: (index.rows(), index.cols()),
            global: index.global_statistics(),
            tree: tree.summary(),
            digest,
            anomalies,
            top_k,
            top_k_pruned,
            components,
            anomalous_area,
            timings,
        })
    }
}
