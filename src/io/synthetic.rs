//! Seeded synthetic grids for demos and benchmarks
//!
//! Terrain is a normal per-cell base (mean 128, std-dev 20) plus four
//! octaves of bilinearly interpolated value noise. Anomalies are bright or
//! dark blobs with a Gaussian falloff from their center.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::index::Rectangle;
use crate::io::error::{Result, invalid_parameter};

const TERRAIN_MEAN: f64 = 128.0;
const TERRAIN_STD_DEV: f64 = 20.0;
const NOISE_AMPLITUDE: f64 = 30.0;
const OCTAVES: u32 = 4;

/// An injected anomaly and how it was applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InjectedAnomaly {
    /// Region the anomaly was painted into
    pub bounds: Rectangle,
    /// Peak intensity change at the center
    pub intensity: f64,
    /// Whether intensity was added (bright) or subtracted (dark)
    pub bright: bool,
}

/// Synthetic grid plus the ground truth of what was injected
#[derive(Debug, Clone)]
pub struct SyntheticGrid {
    /// Generated intensities
    pub grid: Array2<u8>,
    /// Anomalies injected into the terrain
    pub anomalies: Vec<InjectedAnomaly>,
}

/// Generate a `size x size` terrain with `anomaly_count` random anomalies
///
/// # Errors
///
/// Returns `InvalidParameter` if `size` is below 16, too small to place
/// anomalies away from the border
pub fn generate(size: usize, anomaly_count: usize, seed: u64) -> Result<SyntheticGrid> {
    if size < 16 {
        return Err(invalid_parameter("size", &size, &"must be at least 16"));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = terrain(size, &mut rng);

    let margin = size / 10;
    let min_extent = size / 20;
    let max_extent = size / 8;
    let last = size as i32 - 1;

    let mut anomalies = Vec::with_capacity(anomaly_count);
    for _ in 0..anomaly_count {
        let row1 = rng.random_range(margin..=size - margin) as i32;
        let col1 = rng.random_range(margin..=size - margin) as i32;
        let rows = rng.random_range(min_extent..=max_extent) as i32;
        let cols = rng.random_range(min_extent..=max_extent) as i32;

        let anomaly = InjectedAnomaly {
            bounds: Rectangle::new(
                row1.min(last),
                col1.min(last),
                (row1 + rows).min(last),
                (col1 + cols).min(last),
            ),
            intensity: rng.random_range(50.0..100.0),
            bright: rng.random_bool(0.5),
        };
        insert_anomaly(&mut grid, &anomaly);
        anomalies.push(anomaly);
    }

    tracing::debug!(size, anomalies = anomalies.len(), seed, "synthetic grid generated");

    Ok(SyntheticGrid { grid, anomalies })
}

/// Paint an anomaly into `grid` with Gaussian falloff, saturating at 0 and 255
pub fn insert_anomaly(grid: &mut Array2<u8>, anomaly: &InjectedAnomaly) {
    let bounds = anomaly.bounds;
    let (center_row, center_col) = bounds.center();
    let radius_rows = (f64::from(bounds.row2 - bounds.row1) / 2.0).max(0.5);
    let radius_cols = (f64::from(bounds.col2 - bounds.col1) / 2.0).max(0.5);

    for row in bounds.row1..=bounds.row2 {
        for col in bounds.col1..=bounds.col2 {
            let (Ok(r), Ok(c)) = (usize::try_from(row), usize::try_from(col)) else {
                continue;
            };
            let Some(cell) = grid.get_mut([r, c]) else {
                continue;
            };

            let dr = f64::from(row - center_row) / radius_rows;
            let dc = f64::from(col - center_col) / radius_cols;
            let falloff = (-2.0 * dr.mul_add(dr, dc * dc)).exp();
            let delta = anomaly.intensity * falloff;

            let shifted = if anomaly.bright {
                f64::from(*cell) + delta
            } else {
                f64::from(*cell) - delta
            };
            *cell = shifted.clamp(0.0, 255.0) as u8;
        }
    }
}

/// Diagonal gradient from 0 at the top-left to 255 at the bottom-right
pub fn gradient(size: usize) -> Array2<u8> {
    let span = (2 * size).saturating_sub(2).max(1);
    Array2::from_shape_fn((size, size), |(r, c)| ((r + c) * 255 / span) as u8)
}

fn terrain(size: usize, rng: &mut StdRng) -> Array2<u8> {
    let mut noise = Array2::<f64>::zeros((size, size));

    for octave in 0..OCTAVES {
        let scale = 1usize << (5 - octave);
        let amplitude = 1.0 / f64::from(1u32 << octave);
        let lattice = size / scale + 2;

        let control: Array2<f64> =
            Array2::from_shape_fn((lattice, lattice), |_| rng.random_range(-10.0..10.0));
        let at = |i: usize, j: usize| control.get([i, j]).copied().unwrap_or(0.0);

        for ((r, c), value) in noise.indexed_iter_mut() {
            let gr = r as f64 / scale as f64;
            let gc = c as f64 / scale as f64;
            let gi = (gr as usize).min(lattice - 2);
            let gj = (gc as usize).min(lattice - 2);
            let fr = gr - gi as f64;
            let fc = gc - gj as f64;

            let top = at(gi, gj).mul_add(1.0 - fc, at(gi, gj + 1) * fc);
            let bottom = at(gi + 1, gj).mul_add(1.0 - fc, at(gi + 1, gj + 1) * fc);
            let v = top.mul_add(1.0 - fr, bottom * fr);

            *value += v * amplitude * NOISE_AMPLITUDE;
        }
    }

    noise.mapv(|n| {
        let base = gaussian(rng, TERRAIN_MEAN, TERRAIN_STD_DEV);
        (base + n).clamp(0.0, 255.0) as u8
    })
}

// Box-Muller transform
fn gaussian(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random_range(f64::EPSILON..1.0);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    z.mul_add(std_dev, mean)
}
