//! Ranked selection, rectangle lookup, and connectivity over scored regions

/// Connected-component grouping of anomalous leaves
pub mod connectivity;
/// Union-find with path compression and union by rank
pub mod disjoint_set;
/// Query front end over a scored tree
pub mod processor;
/// Bounded top-K selection and ranked result types
pub mod selection;

pub use connectivity::ConnectedComponent;
pub use disjoint_set::DisjointSetUnion;
pub use processor::QueryProcessor;
pub use selection::{BoundedTopK, RankedResult, ScoredRegion};
