//! Tests for seeded synthetic grid generation

#[cfg(test)]
mod tests {
    use gridscan::AnalysisError;
    use gridscan::index::Rectangle;
    use gridscan::io::synthetic::{InjectedAnomaly, generate, gradient, insert_anomaly};
    use ndarray::Array2;

    // Tests equal seeds reproduce the grid and the injected anomalies
    #[test]
    fn test_generation_is_deterministic() {
        let (Ok(first), Ok(second)) = (generate(64, 4, 9), generate(64, 4, 9)) else {
            unreachable!("64 is a valid size");
        };
        assert_eq!(first.grid, second.grid);
        assert_eq!(first.anomalies, second.anomalies);

        let Ok(other) = generate(64, 4, 10) else {
            unreachable!("64 is a valid size");
        };
        assert_ne!(first.grid, other.grid);
    }

    #[test]
    fn test_anomalies_stay_inside_grid() {
        let Ok(generated) = generate(100, 12, 3) else {
            unreachable!("100 is a valid size");
        };
        assert_eq!(generated.grid.dim(), (100, 100));
        assert_eq!(generated.anomalies.len(), 12);

        for anomaly in &generated.anomalies {
            let b = anomaly.bounds;
            assert!(b.is_valid());
            assert!(b.row1 >= 0 && b.col1 >= 0 && b.row2 < 100 && b.col2 < 100);
            assert!((50.0..100.0).contains(&anomaly.intensity));
        }
    }

    #[test]
    fn test_tiny_grid_is_rejected() {
        let result = generate(8, 1, 0);
        assert!(matches!(result, Err(AnalysisError::InvalidParameter { .. })));
    }

    // Tests the falloff peaks at the center and leaves outside cells untouched
    #[test]
    fn test_insert_anomaly_falloff() {
        let mut grid = Array2::<u8>::zeros((10, 10));
        let anomaly = InjectedAnomaly {
            bounds: Rectangle::new(2, 2, 6, 6),
            intensity: 80.0,
            bright: true,
        };
        insert_anomaly(&mut grid, &anomaly);

        assert_eq!(grid.get([4, 4]).copied(), Some(80));
        let corner = grid.get([2, 2]).copied().unwrap_or_default();
        assert!(corner < 5);
        assert_eq!(grid.get([0, 0]).copied(), Some(0));
        assert_eq!(grid.get([7, 4]).copied(), Some(0));

        let dark = InjectedAnomaly {
            bright: false,
            ..anomaly
        };
        insert_anomaly(&mut grid, &dark);
        assert!(grid.iter().all(|&v| v == 0), "dark blob over its own bright twin saturates at 0");
    }

    #[test]
    fn test_gradient_corners() {
        let grid = gradient(5);
        assert_eq!(grid.get([0, 0]).copied(), Some(0));
        assert_eq!(grid.get([4, 4]).copied(), Some(255));
        assert_eq!(grid.get([0, 4]).copied(), Some(127));
        assert_eq!(grid.get([4, 0]), grid.get([0, 4]));
    }
}
