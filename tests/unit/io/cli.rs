//! Tests for command-line parsing, grid acquisition, and report rendering

#[cfg(test)]
mod tests {
    use clap::Parser;
    use gridscan::io::cli::{Cli, render_report, summary_line};
    use gridscan::io::configuration::{
        DEFAULT_ANOMALY_THRESHOLD, DEFAULT_MIN_LEAF_SIZE, DEFAULT_SEED, DEFAULT_SYNTHETIC_SIZE,
        DEFAULT_TOP_K,
    };
    use gridscan::{AnalysisConfig, AnalysisError, AnalysisPipeline};
    use ndarray::{Array2, s};
    use std::path::PathBuf;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["gridscan"]);

        assert_eq!(cli.input, None);
        assert_eq!(cli.size, DEFAULT_SYNTHETIC_SIZE);
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert_eq!(cli.top_k, DEFAULT_TOP_K);
        assert_eq!(cli.min_leaf_size, DEFAULT_MIN_LEAF_SIZE);
        assert!((cli.threshold - DEFAULT_ANOMALY_THRESHOLD).abs() < f64::EPSILON);
        assert!(!cli.quiet);
        assert_eq!(cli.config(), AnalysisConfig::default());
    }

    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "gridscan", "scan.png", "-k", "5", "-t", "1.5", "-l", "8", "--seed", "7", "-s",
            "128", "-a", "3", "-q",
        ]);

        assert_eq!(cli.input, Some(PathBuf::from("scan.png")));
        assert_eq!(cli.size, 128);
        assert_eq!(cli.anomalies, 3);
        assert_eq!(cli.seed, 7);
        assert!(cli.quiet);

        let config = cli.config();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.min_leaf_size, 8);
        assert!((config.threshold - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cli_rejects_non_numeric_threshold() {
        let result = Cli::try_parse_from(["gridscan", "--threshold", "high"]);
        assert!(result.is_err());
    }

    // Tests the synthetic path is taken when no image is given
    #[test]
    fn test_acquire_synthetic_grid() {
        let cli = Cli::parse_from(["gridscan", "--size", "48", "--anomalies", "2"]);
        let Ok(grid) = cli.acquire_grid() else {
            unreachable!("48 is a valid synthetic size");
        };
        assert_eq!(grid.dim(), (48, 48));
    }

    #[test]
    fn test_acquire_missing_image_fails() {
        let cli = Cli::parse_from(["gridscan", "/nonexistent/dir/scan.png"]);
        assert!(matches!(
            cli.acquire_grid(),
            Err(AnalysisError::FileSystem { .. })
        ));
        assert!(cli.run().is_err());
    }

    #[test]
    fn test_run_quiet_on_small_synthetic_grid() {
        let cli = Cli::parse_from(["gridscan", "-s", "32", "-a", "1", "-q"]);
        assert!(cli.run().is_ok());
    }

    #[test]
    fn test_report_rendering() {
        let mut grid = Array2::from_elem((64, 64), 50u8);
        grid.slice_mut(s![16..32, 32..48]).fill(250);
        let Ok(report) = AnalysisPipeline::default().run(grid.view()) else {
            unreachable!("default configuration is valid");
        };

        assert_eq!(
            summary_line(&report),
            "64x64 grid: 21 nodes, 1 of 16 leaves anomalous, 1 components"
        );

        let text = render_report(&report);
        assert!(text.starts_with(&summary_line(&report)));
        assert!(text.contains("top 10 regions:"));
        assert!(text.contains("(16, 32)-(31, 47)"));
        assert!(text.contains("connected components:"));
        assert!(text.contains("anomalous area 256 cells"));
    }
}
