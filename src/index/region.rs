//! Rectangular regions with inclusive bounds and their derived statistics

/// Axis-aligned rectangle with inclusive bounds `[row1, row2] x [col1, col2]`
///
/// Coordinates are signed so callers can describe regions hanging off the
/// grid; the index clamps them before lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rectangle {
    /// Top row (inclusive)
    pub row1: i32,
    /// Left column (inclusive)
    pub col1: i32,
    /// Bottom row (inclusive)
    pub row2: i32,
    /// Right column (inclusive)
    pub col2: i32,
}

impl Rectangle {
    /// Create a rectangle from its top-left and bottom-right corners
    pub const fn new(row1: i32, col1: i32, row2: i32, col2: i32) -> Self {
        Self {
            row1,
            col1,
            row2,
            col2,
        }
    }

    /// Rectangle covering a whole `rows x cols` grid
    ///
    /// Returns `None` for an empty grid or one too large to address with `i32`.
    pub fn covering(rows: usize, cols: usize) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        let row2 = i32::try_from(rows - 1).ok()?;
        let col2 = i32::try_from(cols - 1).ok()?;
        Some(Self::new(0, 0, row2, col2))
    }

    /// Check if the bounds are non-inverted
    pub const fn is_valid(&self) -> bool {
        self.row1 <= self.row2 && self.col1 <= self.col2
    }

    /// Number of rows spanned, zero when inverted
    pub const fn height(&self) -> i64 {
        if self.is_valid() {
            self.row2 as i64 - self.row1 as i64 + 1
        } else {
            0
        }
    }

    /// Number of columns spanned, zero when inverted
    pub const fn width(&self) -> i64 {
        if self.is_valid() {
            self.col2 as i64 - self.col1 as i64 + 1
        } else {
            0
        }
    }

    /// Number of cells covered; degenerate rectangles report zero
    pub const fn area(&self) -> i64 {
        self.height() * self.width()
    }

    /// Center cell using integer division
    pub const fn center(&self) -> (i32, i32) {
        (midpoint(self.row1, self.row2), midpoint(self.col1, self.col2))
    }

    /// Check if a cell lies within the bounds
    pub const fn contains(&self, row: i32, col: i32) -> bool {
        row >= self.row1 && row <= self.row2 && col >= self.col1 && col <= self.col2
    }

    /// Check if two rectangles share at least one cell
    pub const fn intersects(&self, other: &Self) -> bool {
        !(self.row2 < other.row1
            || self.row1 > other.row2
            || self.col2 < other.col1
            || self.col1 > other.col2)
    }

    /// Smallest rectangle enclosing both
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self::new(
            self.row1.min(other.row1),
            self.col1.min(other.col1),
            self.row2.max(other.row2),
            self.col2.max(other.col2),
        )
    }

    /// Check if two rectangles share an edge
    ///
    /// They must overlap on one axis and abut on the other. Corner contact
    /// alone does not count.
    pub const fn is_adjacent_to(&self, other: &Self) -> bool {
        let rows_overlap = self.row1 <= other.row2 && other.row1 <= self.row2;
        let cols_overlap = self.col1 <= other.col2 && other.col1 <= self.col2;

        let abut_horizontally =
            self.col2 as i64 + 1 == other.col1 as i64 || other.col2 as i64 + 1 == self.col1 as i64;
        let abut_vertically =
            self.row2 as i64 + 1 == other.row1 as i64 || other.row2 as i64 + 1 == self.row1 as i64;

        (rows_overlap && abut_horizontally) || (cols_overlap && abut_vertically)
    }

    /// Clip the bounds to a `rows x cols` grid
    ///
    /// The result may be inverted when the rectangle lies entirely outside.
    #[must_use]
    pub fn clamp_to(&self, rows: usize, cols: usize) -> Self {
        let max_row = i32::try_from(rows).unwrap_or(i32::MAX).saturating_sub(1);
        let max_col = i32::try_from(cols).unwrap_or(i32::MAX).saturating_sub(1);
        Self::new(
            self.row1.max(0),
            self.col1.max(0),
            self.row2.min(max_row),
            self.col2.min(max_col),
        )
    }

    /// Split at the integer midpoints into NW, NE, SW, SE
    ///
    /// The four parts tile the rectangle exactly. Parts can be inverted when
    /// a dimension is a single cell; callers skip those.
    pub const fn quadrants(&self) -> [Self; 4] {
        let mid_row = midpoint(self.row1, self.row2);
        let mid_col = midpoint(self.col1, self.col2);
        [
            Self::new(self.row1, self.col1, mid_row, mid_col),
            Self::new(self.row1, mid_col + 1, mid_row, self.col2),
            Self::new(mid_row + 1, self.col1, self.row2, mid_col),
            Self::new(mid_row + 1, mid_col + 1, self.row2, self.col2),
        ]
    }
}

// Rounds toward `lo`; the span is taken in i64 so extreme bounds cannot overflow
const fn midpoint(lo: i32, hi: i32) -> i32 {
    let lo = lo as i64;
    (lo + (hi as i64 - lo) / 2) as i32
}

/// Summary statistics for one rectangular region
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegionStatistics {
    /// Mean intensity
    pub mean: f64,
    /// Population variance, never negative
    pub variance: f64,
    /// Square root of the variance
    pub std_dev: f64,
    /// Sum of intensities
    pub sum: i64,
    /// Number of cells
    pub area: i64,
}

impl RegionStatistics {
    /// Derive statistics from a sum, sum of squares, and cell count
    ///
    /// Variance uses `E[X^2] - E[X]^2` floored at zero to absorb rounding.
    pub fn from_sums(sum: i64, sum_squares: i64, area: i64) -> Self {
        if area <= 0 {
            return Self::default();
        }
        let mean = sum as f64 / area as f64;
        let mean_of_squares = sum_squares as f64 / area as f64;
        let variance = mean.mul_add(-mean, mean_of_squares).max(0.0);

        Self {
            mean,
            variance,
            std_dev: variance.sqrt(),
            sum,
            area,
        }
    }
}

