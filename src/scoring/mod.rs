//! Deviation scoring and anomaly flagging for quadtree regions

/// Z-score scorer, score table, and detection digest
pub mod detector;

pub use detector::{AnomalyDigest, AnomalyScorer, ScoreTable, ScorerState};
