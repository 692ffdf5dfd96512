//! Non-overlapping random shape fields.
//!
//! An [`Envelope`](crate::geometry::Envelope) is cut into a jittered grid
//! ([`partition::GridPartition`]); each cell is kept with probability
//! [`ShapeFieldConfig::frequency`] and receives exactly one shape confined to it, so shapes
//! from one field never overlap. See [`generator::ShapeFieldGenerator`].
use std::collections::BTreeMap;
use std::fmt;

use crate::attribute::parse_number;
use crate::error::{Error, Result};
use crate::geometry::Shape;
use crate::notification::Notification;

pub mod generator;
pub mod partition;

pub use generator::ShapeFieldGenerator;
pub use partition::{Cell, GridPartition, DEFAULT_JITTER_SPREAD};

/// Default retry bound for building one valid shape in a cell.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Upper bound on divisions per axis.
pub const MAX_DIVISIONS: usize = 4096;

/// Upper bound on vertices drawn per shape.
pub const MAX_VERTICES: usize = 1024;

/// Kind of geometry produced for each included cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    Points,
    Lines,
    Polygons,
}

impl ShapeKind {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "points" => Ok(ShapeKind::Points),
            "lines" => Ok(ShapeKind::Lines),
            "polygons" => Ok(ShapeKind::Polygons),
            other => Err(Error::UnrecognizedShapeKind {
                kind: other.to_owned(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Points => "points",
            ShapeKind::Lines => "lines",
            ShapeKind::Polygons => "polygons",
        }
    }

    /// Singular form used as the base of generated shape names.
    pub fn artifact_name(self) -> &'static str {
        match self {
            ShapeKind::Points => "point",
            ShapeKind::Lines => "line",
            ShapeKind::Polygons => "polygon",
        }
    }

    /// Vertex count for this kind; polygons keep the requested count.
    pub fn vertex_count(self, requested: usize) -> usize {
        match self {
            ShapeKind::Points => 1,
            ShapeKind::Lines => 2,
            ShapeKind::Polygons => requested,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for one shape field.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeFieldConfig {
    /// Nominal number of columns.
    pub x_divisions: usize,
    /// Nominal number of rows.
    pub y_divisions: usize,
    /// Probability that a cell receives a shape, in `[0, 1]`.
    pub frequency: f64,
    /// Vertices per shape: 1 point, 2 line, 3 or more convex polygon.
    pub vertices: usize,
    /// Base of generated names (`<base>_<n>`).
    pub base_name: String,
    /// Standard deviation of the jittered break increments.
    pub jitter_spread: f64,
    /// Attempts per cell before it is dropped.
    pub max_attempts: usize,
}

impl Default for ShapeFieldConfig {
    fn default() -> Self {
        Self {
            x_divisions: 10,
            y_divisions: 10,
            frequency: 0.5,
            vertices: 5,
            base_name: "shape".to_owned(),
            jitter_spread: DEFAULT_JITTER_SPREAD,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ShapeFieldConfig {
    pub fn new(x_divisions: usize, y_divisions: usize) -> Self {
        Self {
            x_divisions,
            y_divisions,
            ..Default::default()
        }
    }

    /// Configuration for `kind`: vertex count forced for points and lines, base name taken
    /// from the kind.
    pub fn for_kind(kind: ShapeKind) -> Self {
        let defaults = Self::default();
        Self {
            vertices: kind.vertex_count(defaults.vertices),
            base_name: kind.artifact_name().to_owned(),
            ..defaults
        }
    }

    pub fn with_divisions(mut self, x_divisions: usize, y_divisions: usize) -> Self {
        self.x_divisions = x_divisions;
        self.y_divisions = y_divisions;
        self
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_vertices(mut self, vertices: usize) -> Self {
        self.vertices = vertices;
        self
    }

    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    pub fn with_jitter_spread(mut self, jitter_spread: f64) -> Self {
        self.jitter_spread = jitter_spread;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Build a configuration for `kind` from request parameters.
    ///
    /// Reads `xdivs`, `ydivs`, `fraction`, `vertices` and `std`; absent keys keep their
    /// defaults. `vertices` only applies to polygons.
    pub fn from_parameters(
        kind: ShapeKind,
        parameters: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let mut config = Self::for_kind(kind);
        if let Some(v) = parameters.get("xdivs") {
            config.x_divisions = parse_count("xdivs", v)?;
        }
        if let Some(v) = parameters.get("ydivs") {
            config.y_divisions = parse_count("ydivs", v)?;
        }
        if let Some(v) = parameters.get("fraction") {
            config.frequency = parse_real("fraction", v)?;
        }
        if let Some(v) = parameters.get("vertices") {
            config.vertices = kind.vertex_count(parse_count("vertices", v)?);
        }
        if let Some(v) = parameters.get("std") {
            config.jitter_spread = parse_real("std", v)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let divisions = [
            ("x_divisions", self.x_divisions),
            ("y_divisions", self.y_divisions),
        ];
        for (name, divisions) in divisions {
            if !(1..=MAX_DIVISIONS).contains(&divisions) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be in [1, {MAX_DIVISIONS}], got {divisions}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.frequency) {
            return Err(Error::InvalidConfig(format!(
                "frequency must be in [0, 1], got {}",
                self.frequency
            )));
        }
        if !(1..=MAX_VERTICES).contains(&self.vertices) {
            return Err(Error::InvalidConfig(format!(
                "vertices must be in [1, {MAX_VERTICES}], got {}",
                self.vertices
            )));
        }
        if !(self.jitter_spread.is_finite() && self.jitter_spread > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "jitter_spread must be > 0, got {}",
                self.jitter_spread
            )));
        }
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig("max_attempts must be >= 1".into()));
        }
        Ok(())
    }
}

fn parse_real(key: &str, raw: &str) -> Result<f64> {
    parse_number(raw).ok_or_else(|| {
        Error::InvalidConfig(format!("parameter '{key}' is not a number: '{raw}'"))
    })
}

fn parse_count(key: &str, raw: &str) -> Result<usize> {
    let value = parse_real(key, raw)?;
    if value < 0.0 || value.fract() != 0.0 || value > usize::MAX as f64 {
        return Err(Error::InvalidConfig(format!(
            "parameter '{key}' must be a non-negative integer, got '{raw}'"
        )));
    }
    Ok(value as usize)
}

/// One shape of a field, with its resolved attribute values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedShape {
    pub name: String,
    pub shape: Shape,
    pub attributes: BTreeMap<String, f64>,
}

impl GeneratedShape {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            attributes: BTreeMap::new(),
        }
    }
}

/// Output of one field generation.
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeField {
    pub shapes: Vec<GeneratedShape>,
    /// Cells that went through the inclusion trial.
    pub cells_considered: usize,
    /// Included cells dropped after exhausting their retries.
    pub cells_dropped: usize,
    pub notifications: Vec<Notification>,
}

impl ShapeField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
