//! Fractal terrain surfaces.
//!
//! [`Terrain`] is a square height map of side `2^detail + 1` built by midpoint displacement
//! (diamond-square) and rescaled to a value range. It is sampled with bilinear interpolation
//! at normalized coordinates, and [`Terrain::fill_grid`] scans it onto a regular grid.
//! The whole map lives in memory, so keep `detail` modest.
use std::ops::Range;

use rand::RngCore;
use tracing::debug;

use crate::distribution::rand01;
use crate::error::{Error, Result};

pub const MAX_DETAIL: u32 = 12;

/// Configuration for [`Terrain::generate`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainConfig {
    /// Output value range; `start < end`.
    pub range: Range<f64>,
    /// Subdivision levels; the map side is `2^detail + 1`.
    pub detail: u32,
    /// Displacement decay per level, in `(0, 1]`. Higher is rougher.
    pub roughness: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            range: 0.0..4000.0,
            detail: 8,
            roughness: 0.55,
        }
    }
}

impl TerrainConfig {
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = min..max;
        self
    }

    pub fn with_detail(mut self, detail: u32) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_roughness(mut self, roughness: f64) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let Range { start, end } = self.range;
        if !(start.is_finite() && end.is_finite() && start < end) {
            return Err(Error::InvalidConfig(format!(
                "range must be finite with min < max, got {start}..{end}"
            )));
        }
        if !(1..=MAX_DETAIL).contains(&self.detail) {
            return Err(Error::InvalidConfig(format!(
                "detail must be in 1..={MAX_DETAIL}, got {}",
                self.detail
            )));
        }
        if !(self.roughness > 0.0 && self.roughness <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "roughness must be in (0, 1], got {}",
                self.roughness
            )));
        }
        Ok(())
    }
}

/// Square fractal height map.
#[derive(Clone, Debug)]
pub struct Terrain {
    size: usize,
    heights: Vec<f64>,
}

impl Terrain {
    pub fn generate<R: RngCore + ?Sized>(config: &TerrainConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        let size = (1usize << config.detail) + 1;
        let mut heights = vec![0.0; size * size];
        let idx = |x: usize, y: usize| y * size + x;

        for (x, y) in [(0, 0), (size - 1, 0), (0, size - 1), (size - 1, size - 1)] {
            heights[idx(x, y)] = displacement(1.0, rng);
        }

        let mut step = size - 1;
        let mut amplitude = config.roughness;
        while step > 1 {
            let half = step / 2;

            // Diamond: centre of each square from its four corners.
            for y in (half..size).step_by(step) {
                for x in (half..size).step_by(step) {
                    let mean = (heights[idx(x - half, y - half)]
                        + heights[idx(x + half, y - half)]
                        + heights[idx(x - half, y + half)]
                        + heights[idx(x + half, y + half)])
                        * 0.25;
                    heights[idx(x, y)] = mean + displacement(amplitude, rng);
                }
            }

            // Square: edge midpoints from their in-bounds neighbours.
            for y in (0..size).step_by(half) {
                let x_start = if (y / half) % 2 == 0 { half } else { 0 };
                for x in (x_start..size).step_by(step) {
                    let mut sum = 0.0;
                    let mut count = 0.0;
                    if x >= half {
                        sum += heights[idx(x - half, y)];
                        count += 1.0;
                    }
                    if x + half < size {
                        sum += heights[idx(x + half, y)];
                        count += 1.0;
                    }
                    if y >= half {
                        sum += heights[idx(x, y - half)];
                        count += 1.0;
                    }
                    if y + half < size {
                        sum += heights[idx(x, y + half)];
                        count += 1.0;
                    }
                    heights[idx(x, y)] = sum / count + displacement(amplitude, rng);
                }
            }

            step = half;
            amplitude *= config.roughness;
        }

        rescale(&mut heights, &config.range);
        debug!(size, detail = config.detail, "generated terrain");
        Ok(Self { size, heights })
    }

    /// Side length of the height map.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw height at grid indices, clamped to the map.
    pub fn height(&self, x: usize, y: usize) -> f64 {
        let x = x.min(self.size - 1);
        let y = y.min(self.size - 1);
        self.heights[y * self.size + x]
    }

    /// Bilinearly interpolated height at normalized coordinates; inputs are clamped to
    /// `[0, 1]`.
    pub fn altitude(&self, x: f64, y: f64) -> f64 {
        let last = (self.size - 1) as f64;
        let fx = x.clamp(0.0, 1.0) * last;
        let fy = y.clamp(0.0, 1.0) * last;
        let ix = (fx.floor() as usize).min(self.size - 2);
        let iy = (fy.floor() as usize).min(self.size - 2);
        let tx = fx - ix as f64;
        let ty = fy - iy as f64;

        let top = lerp(self.height(ix, iy), self.height(ix + 1, iy), tx);
        let bottom = lerp(self.height(ix, iy + 1), self.height(ix + 1, iy + 1), tx);
        lerp(top, bottom, ty)
    }

    /// Sample a `columns × rows` grid at `(x / columns, y / rows)`, scanned X-major.
    pub fn fill_grid(&self, columns: usize, rows: usize) -> SurfaceGrid {
        let dx = 1.0 / columns.max(1) as f64;
        let dy = 1.0 / rows.max(1) as f64;
        let mut values = Vec::with_capacity(columns * rows);
        for x in 0..columns {
            for y in 0..rows {
                values.push(self.altitude(x as f64 * dx, y as f64 * dy));
            }
        }
        SurfaceGrid {
            columns,
            rows,
            values,
        }
    }
}

/// Values of a surface over a regular grid, stored X-major.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceGrid {
    pub columns: usize,
    pub rows: usize,
    pub values: Vec<f64>,
}

impl SurfaceGrid {
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.columns || y >= self.rows {
            return None;
        }
        self.values.get(x * self.rows + y).copied()
    }

    pub fn min_max(&self) -> Option<(f64, f64)> {
        let first = *self.values.first()?;
        Some(
            self.values
                .iter()
                .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
        )
    }
}

fn displacement<R: RngCore + ?Sized>(amplitude: f64, rng: &mut R) -> f64 {
    (rand01(rng) * 2.0 - 1.0) * amplitude
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn rescale(values: &mut [f64], range: &Range<f64>) {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = hi - lo;
    let target = range.end - range.start;
    for v in values.iter_mut() {
        *v = if span > 0.0 {
            (range.start + (*v - lo) / span * target).clamp(range.start, range.end)
        } else {
            range.start
        };
    }
}
