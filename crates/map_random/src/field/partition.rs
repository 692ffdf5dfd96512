//! Jittered grid partition of an envelope.
//!
//! Each axis is cut by a break sequence that starts at the envelope minimum and advances by
//! jittered steps around the nominal cell width while it stays below the maximum. Breaks are
//! strictly increasing, so the cells between consecutive breaks never overlap.
use geo::{coord, Coord, Rect};
use rand::RngCore;
use tracing::warn;

use crate::distribution::{rand01, Distribution};
use crate::error::{Error, Result};
use crate::geometry::Envelope;

/// Spread of the normal step distribution, in envelope units.
pub const DEFAULT_JITTER_SPREAD: f64 = 0.1;

const MAX_STEPS_PER_DIVISION: usize = 64;

/// Step sampler: normal around the nominal width, redrawn uniformly when out of bounds.
#[derive(Clone, Debug)]
pub struct JitteredIncrement {
    width: f64,
    normal: Distribution,
}

impl JitteredIncrement {
    pub fn new(width: f64, spread: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "nominal cell width must be > 0, got {width}"
            )));
        }
        let normal = Distribution::gaussian(width, spread)
            .map_err(|e| Error::InvalidConfig(format!("jitter spread: {e}")))?;
        Ok(Self { width, normal })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// One step: negative draws become uniform in `[0, w)`, draws above `2w` become uniform
    /// in `[0, 1.4w)`.
    pub fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> f64 {
        let step = self.normal.sample(rng).as_f64();
        if step < 0.0 {
            rand01(rng) * self.width
        } else if step > self.width * 2.0 {
            rand01(rng) * self.width * 1.4
        } else {
            step
        }
    }
}

/// Strictly increasing breaks in `[min, max)`, starting at `min`.
pub fn break_sequence<R: RngCore + ?Sized>(
    min: f64,
    max: f64,
    divisions: usize,
    increment: &JitteredIncrement,
    rng: &mut R,
) -> Vec<f64> {
    let mut breaks = vec![min];
    let mut limit = min;
    let max_steps = MAX_STEPS_PER_DIVISION
        .saturating_mul(divisions.max(1))
        .saturating_add(MAX_STEPS_PER_DIVISION);
    for _ in 0..max_steps {
        limit += increment.sample(rng);
        if limit >= max {
            return breaks;
        }
        if breaks.last().is_some_and(|last| limit > *last) {
            breaks.push(limit);
        }
    }
    warn!(
        min,
        max,
        divisions,
        "break sequence did not reach the envelope maximum; truncating"
    );
    breaks
}

/// A rectangle between consecutive breaks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub bounds: Rect<f64>,
}

impl Cell {
    pub fn new(min: Coord<f64>, max: Coord<f64>) -> Self {
        Self {
            bounds: Rect::new(min, max),
        }
    }

    pub fn from_envelope(envelope: &Envelope) -> Self {
        Self {
            bounds: envelope.rect(),
        }
    }

    pub fn min(&self) -> Coord<f64> {
        self.bounds.min()
    }

    pub fn max(&self) -> Coord<f64> {
        self.bounds.max()
    }

    /// Uniform point in `[min, max)` on both axes.
    pub fn random_point<R: RngCore + ?Sized>(&self, rng: &mut R) -> Coord<f64> {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        coord! {
            x: min.x + rand01(rng) * (max.x - min.x),
            y: min.y + rand01(rng) * (max.y - min.y),
        }
    }

    /// Closed containment test.
    pub fn contains(&self, p: Coord<f64>) -> bool {
        let (min, max) = (self.min(), self.max());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }
}

/// Break sequences along both axes of an envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPartition {
    pub x_breaks: Vec<f64>,
    pub y_breaks: Vec<f64>,
}

impl GridPartition {
    /// Partition `envelope` into roughly `x_divisions × y_divisions` jittered cells.
    pub fn jittered<R: RngCore + ?Sized>(
        envelope: &Envelope,
        x_divisions: usize,
        y_divisions: usize,
        spread: f64,
        rng: &mut R,
    ) -> Result<Self> {
        if x_divisions == 0 || y_divisions == 0 {
            return Err(Error::InvalidConfig(
                "division counts must be >= 1".into(),
            ));
        }
        let x_step = JitteredIncrement::new(envelope.width() / x_divisions as f64, spread)?;
        let y_step = JitteredIncrement::new(envelope.height() / y_divisions as f64, spread)?;

        let x_breaks = break_sequence(
            envelope.min_x(),
            envelope.max_x(),
            x_divisions,
            &x_step,
            rng,
        );
        let y_breaks = break_sequence(
            envelope.min_y(),
            envelope.max_y(),
            y_divisions,
            &y_step,
            rng,
        );
        Ok(Self { x_breaks, y_breaks })
    }

    /// Number of interior cells.
    pub fn cell_count(&self) -> usize {
        self.x_breaks.len().saturating_sub(1) * self.y_breaks.len().saturating_sub(1)
    }

    /// Interior cells, X-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.x_breaks.windows(2).flat_map(move |xs| {
            self.y_breaks.windows(2).map(move |ys| {
                Cell::new(coord! { x: xs[0], y: ys[0] }, coord! { x: xs[1], y: ys[1] })
            })
        })
    }
}
