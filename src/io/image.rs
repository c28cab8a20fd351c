//! Grid acquisition from image files and raw row-major buffers

use std::path::Path;

use ndarray::Array2;

use crate::io::error::{AnalysisError, Result, invalid_input};

/// Decode an image file into an 8-bit luminance grid (rows = image height)
///
/// Any format the `image` crate can open is accepted; colour images are
/// converted to luma.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist or cannot be accessed
/// - The file cannot be decoded as an image
/// - The decoded image has zero width or height
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<Array2<u8>> {
    let path_buf = path.as_ref().to_path_buf();
    if let Err(source) = std::fs::metadata(&path_buf) {
        return Err(AnalysisError::FileSystem {
            path: path_buf,
            operation: "open",
            source,
        });
    }

    let img = image::open(&path_buf).map_err(|e| AnalysisError::ImageLoad {
        path: path_buf,
        source: e,
    })?;
    let luma = img.to_luma8();

    let (width, height) = (luma.width() as usize, luma.height() as usize);
    grid_from_row_major(height, width, luma.into_raw())
}

/// Wrap a row-major sample buffer as a `height x width` grid
///
/// # Errors
///
/// Returns `InvalidInput` if either dimension is zero or the buffer length
/// does not equal `height * width`
pub fn grid_from_row_major(height: usize, width: usize, samples: Vec<u8>) -> Result<Array2<u8>> {
    if height == 0 || width == 0 {
        return Err(invalid_input(&format!(
            "grid dimensions must be positive, got {height}x{width}"
        )));
    }
    let len = samples.len();
    Array2::from_shape_vec((height, width), samples).map_err(|err| {
        invalid_input(&format!(
            "expected {} samples for a {height}x{width} grid, got {len}: {err}",
            height.saturating_mul(width)
        ))
    })
}
