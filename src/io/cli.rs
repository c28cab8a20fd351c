//! Command-line interface for running an analysis on an image or synthetic grid

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Parser;
use ndarray::Array2;

use crate::io::configuration::{
    AnalysisConfig, DEFAULT_ANOMALY_THRESHOLD, DEFAULT_MIN_LEAF_SIZE, DEFAULT_SEED,
    DEFAULT_SYNTHETIC_ANOMALIES, DEFAULT_SYNTHETIC_SIZE, DEFAULT_TOP_K,
};
use crate::io::error::Result;
use crate::io::{image, synthetic};
use crate::pipeline::{AnalysisPipeline, AnalysisReport};

#[derive(Parser, Debug)]
#[command(name = "gridscan")]
#[command(
    author,
    version,
    about = "Find anomalous regions in a grayscale grid with summed-area tables and a quadtree"
)]
/// Command-line arguments for the analysis tool
pub struct Cli {
    /// Image to analyze; a synthetic terrain is generated when omitted
    #[arg(value_name = "IMAGE")]
    pub input: Option<PathBuf>,

    /// Edge length of the synthetic grid
    #[arg(short, long, default_value_t = DEFAULT_SYNTHETIC_SIZE)]
    pub size: usize,

    /// Number of anomalies injected into the synthetic grid
    #[arg(short, long, default_value_t = DEFAULT_SYNTHETIC_ANOMALIES)]
    pub anomalies: usize,

    /// Random seed for the synthetic grid
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of regions in the ranked output
    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    /// Anomaly threshold in global standard deviations
    #[arg(short, long, default_value_t = DEFAULT_ANOMALY_THRESHOLD)]
    pub threshold: f64,

    /// Quadtree leaf edge length
    #[arg(short = 'l', long, default_value_t = DEFAULT_MIN_LEAF_SIZE)]
    pub min_leaf_size: usize,

    /// Only print the summary line
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Analysis parameters selected on the command line
    pub const fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            min_leaf_size: self.min_leaf_size,
            threshold: self.threshold,
            top_k: self.top_k,
        }
    }

    /// Load the input image or generate the synthetic grid
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be decoded or the synthetic
    /// parameters are invalid
    pub fn acquire_grid(&self) -> Result<Array2<u8>> {
        match &self.input {
            Some(path) => image::load_grayscale(path),
            None => synthetic::generate(self.size, self.anomalies, self.seed)
                .map(|generated| generated.grid),
        }
    }

    /// Acquire the grid, run the pipeline, and print the report
    ///
    /// # Errors
    ///
    /// Returns an error if grid acquisition, configuration validation, or
    /// index construction fails
    // Allow print for the report itself
    #[allow(clippy::print_stdout)]
    pub fn run(&self) -> Result<()> {
        let grid = self.acquire_grid()?;
        let report = AnalysisPipeline::new(self.config()).run(grid.view())?;

        let text = if self.quiet {
            summary_line(&report)
        } else {
            render_report(&report)
        };

        println!("{text}");
        Ok(())
    }
}

/// One-line summary of a report
pub fn summary_line(report: &AnalysisReport) -> String {
    format!(
        "{}x{} grid: {} nodes, {} of {} leaves anomalous, {} components",
        report.dimensions.0,
        report.dimensions.1,
        report.tree.node_count,
        report.digest.flagged_leaves,
        report.digest.scored_leaves,
        report.components.len()
    )
}

/// Multi-section text report
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", summary_line(report));
    let _ = writeln!(
        out,
        "global mean {:.2}, std-dev {:.2}",
        report.global.mean, report.global.std_dev
    );
    let _ = writeln!(
        out,
        "tree: depth {}, leaf size {}, built in {:?}",
        report.tree.max_depth, report.tree.min_leaf_size, report.tree.build_time
    );
    let _ = writeln!(
        out,
        "scores: min {:.3}, max {:.3}, mean {:.3}",
        report.digest.min_score, report.digest.max_score, report.digest.mean_score
    );

    let _ = writeln!(out, "\ntop {} regions:", report.top_k.len());
    for (rank, region) in report.top_k.regions.iter().enumerate() {
        let b = region.bounds;
        let _ = writeln!(
            out,
            "  {:>3}. ({}, {})-({}, {})  score {:.3}  node {}",
            rank + 1,
            b.row1,
            b.col1,
            b.row2,
            b.col2,
            region.score,
            region.node_id
        );
    }
    let _ = writeln!(
        out,
        "exhaustive: {} visited in {:?}; pruned: {} visited, {} subtrees skipped in {:?}",
        report.top_k.nodes_visited,
        report.top_k.elapsed,
        report.top_k_pruned.nodes_visited,
        report.top_k_pruned.nodes_pruned,
        report.top_k_pruned.elapsed
    );

    let _ = writeln!(out, "\nconnected components:");
    for component in &report.components {
        let b = component.bounds;
        let _ = writeln!(
            out,
            "  #{} ({}, {})-({}, {})  area {}  leaves {}  max {:.3}  avg {:.3}",
            component.id,
            b.row1,
            b.col1,
            b.row2,
            b.col2,
            component.total_area,
            component.members.len(),
            component.max_score,
            component.avg_score
        );
    }
    let _ = write!(
        out,
        "anomalous area {} cells; index {:?}, tree {:?}, scoring {:?}, queries {:?}",
        report.anomalous_area,
        report.timings.index,
        report.timings.tree,
        report.timings.scoring,
        report.timings.queries
    );
    out
}
