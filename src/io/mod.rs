//! Input/output collaborators, configuration, and error handling

/// Command-line parsing and report rendering
pub mod cli;
/// Default constants and the per-run analysis configuration
pub mod configuration;
/// Error types shared across the crate
pub mod error;
/// Grid loading from image files and raw buffers
pub mod image;
/// Seeded synthetic terrain grids with injected anomalies
pub mod synthetic;
