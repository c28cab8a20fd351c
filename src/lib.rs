//! Hierarchical anomaly analytics over dense 8-bit intensity grids
//!
//! A summed-area index answers rectangle statistics in constant time, a
//! quadtree caches those statistics per region, a z-score scorer flags
//! regions that deviate from the global mean, and a query layer ranks and
//! groups the flagged regions.

#![forbid(unsafe_code)]

/// Summed-area tables and rectangle statistics
pub mod index;
/// Input/output operations, configuration, and error handling
pub mod io;
/// Orchestration of the full analysis
pub mod pipeline;
/// Top-K selection, rectangle lookup, and connectivity queries
pub mod query;
/// Deviation scoring and anomaly flagging
pub mod scoring;
/// Quadtree spatial decomposition
pub mod tree;

pub use io::configuration::AnalysisConfig;
pub use io::error::{AnalysisError, Result};
pub use pipeline::{AnalysisPipeline, AnalysisReport};
