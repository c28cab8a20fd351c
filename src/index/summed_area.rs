//! Summed-area tables for constant-time rectangle statistics
//!
//! Two padded prefix tables are built with the recurrence
//! `acc[i][j] = v[i-1][j-1] + acc[i-1][j] + acc[i][j-1] - acc[i-1][j-1]`,
//! one over raw intensities and one over their squares. The extra leading
//! row and column of zeros remove every boundary branch from the query path.
//!
//! Any rectangle sum is then four lookups by inclusion-exclusion:
//!
//! ```text
//!   +-------+-------+
//!   |   D   |   C   |     sum = A - B - C + D
//!   +-------+-------+
//!   |   B   |   A   |
//!   +-------+-------+
//! ```

use std::time::Instant;

use ndarray::{Array2, ArrayView2};

use crate::index::region::{Rectangle, RegionStatistics};
use crate::io::configuration::MAX_GRID_DIMENSION;
use crate::io::error::{Result, invalid_input};

/// Prefix-sum index over an 8-bit intensity grid
///
/// The default value is an unbuilt index: every query on it reports zero.
#[derive(Debug, Clone)]
pub struct SummedAreaIndex {
    /// Padded prefix sums of intensities, `(rows + 1) x (cols + 1)`
    sums: Array2<i64>,
    /// Padded prefix sums of squared intensities
    squares: Array2<i64>,
    rows: usize,
    cols: usize,
    global: RegionStatistics,
    built: bool,
}

impl Default for SummedAreaIndex {
    fn default() -> Self {
        Self {
            sums: Array2::zeros((0, 0)),
            squares: Array2::zeros((0, 0)),
            rows: 0,
            cols: 0,
            global: RegionStatistics::default(),
            built: false,
        }
    }
}

impl SummedAreaIndex {
    /// Build both prefix tables and the whole-grid statistics in one pass
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the grid has no rows or no columns, or if
    /// either dimension exceeds `MAX_GRID_DIMENSION`, the largest extent
    /// `Rectangle` coordinates can address
    pub fn build(grid: ArrayView2<'_, u8>) -> Result<Self> {
        let start = Instant::now();
        let (rows, cols) = grid.dim();

        if rows == 0 || cols == 0 {
            return Err(invalid_input(&format!(
                "cannot index an empty grid ({rows}x{cols})"
            )));
        }
        if rows > MAX_GRID_DIMENSION || cols > MAX_GRID_DIMENSION {
            return Err(invalid_input(&format!(
                "grid {rows}x{cols} exceeds the maximum dimension {MAX_GRID_DIMENSION}"
            )));
        }

        let mut sums = Array2::<i64>::zeros((rows + 1, cols + 1));
        let mut squares = Array2::<i64>::zeros((rows + 1, cols + 1));

        for ((r, c), &value) in grid.indexed_iter() {
            let value = i64::from(value);
            accumulate(&mut sums, r + 1, c + 1, value);
            accumulate(&mut squares, r + 1, c + 1, value * value);
        }

        let total = sums.get([rows, cols]).copied().unwrap_or(0);
        let total_squares = squares.get([rows, cols]).copied().unwrap_or(0);
        let global = RegionStatistics::from_sums(total, total_squares, (rows * cols) as i64);

        tracing::debug!(
            rows,
            cols,
            mean = global.mean,
            std_dev = global.std_dev,
            elapsed_us = start.elapsed().as_micros() as u64,
            "summed-area index built"
        );

        Ok(Self {
            sums,
            squares,
            rows,
            cols,
            global,
            built: true,
        })
    }

    /// Check if `build` completed successfully
    pub const fn is_built(&self) -> bool {
        self.built
    }

    /// Number of grid rows (zero when unbuilt)
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns (zero when unbuilt)
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Rectangle covering the whole indexed grid
    pub fn bounds(&self) -> Option<Rectangle> {
        if self.built {
            Rectangle::covering(self.rows, self.cols)
        } else {
            None
        }
    }

    /// Sum of intensities inside `rect`, clamped to the grid
    ///
    /// Inverted rectangles, after clamping, sum to zero.
    pub fn query_sum(&self, rect: &Rectangle) -> i64 {
        self.clamped(rect)
            .map_or(0, |clamped| range_total(&self.sums, &clamped))
    }

    /// Sum of squared intensities inside `rect`, clamped to the grid
    pub fn query_sum_squares(&self, rect: &Rectangle) -> i64 {
        self.clamped(rect)
            .map_or(0, |clamped| range_total(&self.squares, &clamped))
    }

    /// Mean, variance, standard deviation, sum, and area of `rect`
    ///
    /// Sums cover only the part of `rect` inside the grid, but the divisor
    /// is the area of `rect` as given, so cells hanging off the grid count
    /// as zeros. A rectangle with no cells inside the grid yields defaults.
    pub fn query_statistics(&self, rect: &Rectangle) -> RegionStatistics {
        let Some(clamped) = self.clamped(rect) else {
            return RegionStatistics::default();
        };
        RegionStatistics::from_sums(
            range_total(&self.sums, &clamped),
            range_total(&self.squares, &clamped),
            rect.area(),
        )
    }

    /// Mean intensity of `rect` over its full area, off-grid cells as zero
    pub fn query_mean(&self, rect: &Rectangle) -> f64 {
        let Some(clamped) = self.clamped(rect) else {
            return 0.0;
        };
        let area = rect.area();
        if area > 0 {
            range_total(&self.sums, &clamped) as f64 / area as f64
        } else {
            0.0
        }
    }

    /// Variance of intensities inside `rect`
    pub fn query_variance(&self, rect: &Rectangle) -> f64 {
        self.query_statistics(rect).variance
    }

    /// Statistics of the whole grid, fixed at build time
    pub const fn global_statistics(&self) -> RegionStatistics {
        self.global
    }

    /// Mean intensity of the whole grid
    pub const fn global_mean(&self) -> f64 {
        self.global.mean
    }

    /// Variance of the whole grid
    pub const fn global_variance(&self) -> f64 {
        self.global.variance
    }

    /// Standard deviation of the whole grid
    pub const fn global_std_dev(&self) -> f64 {
        self.global.std_dev
    }

    /// Check that `rect` lies fully inside the grid without clamping
    ///
    /// Distinguishes a legitimately empty answer from a malformed query,
    /// which the sum queries cannot do on their own.
    pub fn is_valid_query(&self, rect: &Rectangle) -> bool {
        self.built
            && rect.is_valid()
            && rect.row1 >= 0
            && rect.col1 >= 0
            && (rect.row2 as i64) < self.rows as i64
            && (rect.col2 as i64) < self.cols as i64
    }

    /// Recompute sum and sum of squares by enumeration and compare
    ///
    /// Only intended for correctness testing against the source grid.
    pub fn verify(&self, grid: ArrayView2<'_, u8>, rect: &Rectangle) -> bool {
        let mut brute_sum = 0i64;
        let mut brute_squares = 0i64;

        for row in rect.row1..=rect.row2 {
            for col in rect.col1..=rect.col2 {
                let (Ok(r), Ok(c)) = (usize::try_from(row), usize::try_from(col)) else {
                    continue;
                };
                if let Some(&value) = grid.get([r, c]) {
                    let value = i64::from(value);
                    brute_sum += value;
                    brute_squares += value * value;
                }
            }
        }

        brute_sum == self.query_sum(rect) && brute_squares == self.query_sum_squares(rect)
    }

    fn clamped(&self, rect: &Rectangle) -> Option<Rectangle> {
        if !self.built {
            return None;
        }
        let clamped = rect.clamp_to(self.rows, self.cols);
        clamped.is_valid().then_some(clamped)
    }
}

// Fills padded cell (i, j), i and j >= 1, from its three predecessors
fn accumulate(table: &mut Array2<i64>, i: usize, j: usize, value: i64) {
    let at = |r: usize, c: usize| table.get([r, c]).copied().unwrap_or(0);
    let total = value + at(i - 1, j) + at(i, j - 1) - at(i - 1, j - 1);
    if let Some(slot) = table.get_mut([i, j]) {
        *slot = total;
    }
}

// Expects a clamped, non-inverted rectangle
fn range_total(table: &Array2<i64>, rect: &Rectangle) -> i64 {
    let r1 = rect.row1 as usize;
    let c1 = rect.col1 as usize;
    let r2 = rect.row2 as usize + 1;
    let c2 = rect.col2 as usize + 1;

    let at = |r: usize, c: usize| table.get([r, c]).copied().unwrap_or(0);

    at(r2, c2) - at(r1, c2) - at(r2, c1) + at(r1, c1)
}
