//! Tests for error types including source chaining and message formatting

#[cfg(test)]
mod tests {
    use gridscan::AnalysisError;
    use gridscan::io::error::{invalid_input, invalid_parameter};
    use std::error::Error;
    use std::path::PathBuf;

    // Tests file system errors expose their I/O source
    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = AnalysisError::FileSystem {
            path: "/tmp/grid.png".into(),
            operation: "open",
            source: io_error,
        };

        assert!(error.source().is_some());
        let message = error.to_string();
        assert!(message.contains("open"));
        assert!(message.contains("/tmp/grid.png"));
        assert!(message.contains("file not found"));
    }

    #[test]
    fn test_invalid_parameter_error() {
        let error = invalid_parameter("min_leaf_size", &0, &"must be positive");

        let message = error.to_string();
        assert!(message.contains("min_leaf_size"));
        assert!(message.contains("'0'"));
        assert!(message.contains("must be positive"));
        assert!(error.source().is_none());
    }

    #[test]
    fn test_invalid_input_error() {
        let error = invalid_input(&"grid has zero rows");
        assert!(matches!(error, AnalysisError::InvalidInput { .. }));
        assert!(error.to_string().contains("grid has zero rows"));
    }

    // Tests the stage ordering error names both sides of the dependency
    #[test]
    fn test_uninitialized_names_both_stages() {
        let error = AnalysisError::Uninitialized {
            stage: "query processor",
            requires: "anomaly scores",
        };
        let message = error.to_string();
        assert!(message.contains("query processor"));
        assert!(message.contains("anomaly scores"));
    }

    #[test]
    fn test_image_load_error() {
        let image_error = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "access denied",
        ));
        let error = AnalysisError::ImageLoad {
            path: PathBuf::from("/restricted/scan.png"),
            source: image_error,
        };

        let message = error.to_string();
        assert!(message.contains("/restricted/scan.png"));
        assert!(message.contains("access denied"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_conversions_from_library_errors() {
        let from_io: AnalysisError = std::io::Error::other("disk gone").into();
        assert!(matches!(from_io, AnalysisError::FileSystem { .. }));

        let from_image: AnalysisError = image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        ))
        .into();
        assert!(matches!(from_image, AnalysisError::ImageLoad { .. }));
    }
}
