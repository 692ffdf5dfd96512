//! Planar geometry used by the shape field generator.
//!
//! [`Envelope`] is the rectangle a field is generated in and [`Projection`] the code carried
//! along with every shape. Shapes are `geo` points, lines and polygons wrapped in
//! [`Geometry`]; no reprojection is done.
use std::fmt;

use geo::{
    coord, Area, BoundingRect, ConvexHull, Coord, Line, MultiPoint, Point, Polygon, Rect,
    Validation,
};

use crate::error::{Error, Result};

/// Opaque spatial reference code, e.g. `EPSG:4326`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection(String);

impl Projection {
    pub const DEFAULT_CODE: &'static str = "EPSG:4326";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CODE)
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Axis-aligned bounding rectangle in a projection.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    rect: Rect<f64>,
    projection: Projection,
}

impl Envelope {
    /// Create an envelope; bounds must be finite with `min < max` on both axes.
    pub fn new(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        projection: Projection,
    ) -> Result<Self> {
        if ![min_x, max_x, min_y, max_y].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidConfig(
                "envelope bounds must be finite".into(),
            ));
        }
        if min_x >= max_x || min_y >= max_y {
            return Err(Error::InvalidConfig(format!(
                "envelope must satisfy min < max on both axes, got x [{min_x}, {max_x}] y [{min_y}, {max_y}]"
            )));
        }
        Ok(Self {
            rect: Rect::new(coord! { x: min_x, y: min_y }, coord! { x: max_x, y: max_y }),
            projection,
        })
    }

    pub fn rect(&self) -> Rect<f64> {
        self.rect
    }

    pub fn min(&self) -> Coord<f64> {
        self.rect.min()
    }

    pub fn max(&self) -> Coord<f64> {
        self.rect.max()
    }

    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Closed containment test; boundary points count as inside.
    pub fn contains(&self, p: Coord<f64>) -> bool {
        let (min, max) = (self.rect.min(), self.rect.max());
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }
}

/// Point, line or polygon geometry of one shape.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Geometry {
    Empty,
    Point(Point<f64>),
    Line(Line<f64>),
    Polygon(Polygon<f64>),
}

impl Geometry {
    /// Convex hull of `points` as a polygon; no points gives [`Geometry::Empty`].
    ///
    /// Degenerate inputs (repeated or collinear points) yield a zero-area polygon, which
    /// [`Geometry::is_valid`] rejects.
    pub fn convex_hull(points: &[Coord<f64>]) -> Self {
        if points.is_empty() {
            return Geometry::Empty;
        }
        let points: MultiPoint<f64> = points.iter().copied().collect();
        Geometry::Polygon(points.convex_hull())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Geometry::Empty)
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            Geometry::Empty => None,
            Geometry::Point(p) => Some(p.bounding_rect()),
            Geometry::Line(l) => Some(l.bounding_rect()),
            Geometry::Polygon(p) => p.bounding_rect(),
        }
    }

    /// OGC validity, plus a non-zero area for polygons.
    pub fn is_valid(&self) -> bool {
        match self {
            Geometry::Empty => false,
            Geometry::Point(p) => p.is_valid(),
            Geometry::Line(l) => l.is_valid(),
            Geometry::Polygon(p) => p.unsigned_area() > 0.0 && p.is_valid(),
        }
    }
}

/// A geometry tagged with its projection.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    pub geometry: Geometry,
    pub projection: Projection,
}

impl Shape {
    pub fn new(geometry: Geometry, projection: Projection) -> Self {
        Self {
            geometry,
            projection,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.geometry.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use geo::{Contains, LineString};

    use super::*;

    #[test]
    fn envelope_rejects_inverted_or_non_finite_bounds() {
        assert!(Envelope::new(1.0, 0.0, 0.0, 1.0, Projection::default()).is_err());
        assert!(Envelope::new(0.0, 1.0, 0.0, 0.0, Projection::default()).is_err());
        assert!(Envelope::new(0.0, f64::INFINITY, 0.0, 1.0, Projection::default()).is_err());
    }

    #[test]
    fn envelope_reports_extent() {
        let env = Envelope::new(-75.2, -72.6, 3.5, 5.3, Projection::new("EPSG:4326")).unwrap();
        assert!((env.width() - 2.6).abs() < 1e-9);
        assert!((env.height() - 1.8).abs() < 1e-9);
        assert!(env.contains(coord! { x: -74.0, y: 4.0 }));
        assert!(env.contains(env.min()));
        assert!(!env.contains(coord! { x: -70.0, y: 4.0 }));
        assert_eq!(env.projection().code(), "EPSG:4326");
    }

    #[test]
    fn validity_rules() {
        let origin = coord! { x: 0.0, y: 0.0 };
        let one = coord! { x: 1.0, y: 1.0 };
        assert!(!Geometry::Empty.is_valid());
        assert!(Geometry::Point(origin.into()).is_valid());
        assert!(!Geometry::Point(Point::new(f64::NAN, 0.0)).is_valid());
        assert!(!Geometry::Line(Line::new(one, one)).is_valid());
        assert!(Geometry::Line(Line::new(origin, one)).is_valid());

        let bow_tie = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        assert!(!Geometry::Polygon(bow_tie).is_valid());
    }

    #[test]
    fn hull_drops_interior_points() {
        let points = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 4.0, y: 0.0 },
            coord! { x: 4.0, y: 4.0 },
            coord! { x: 0.0, y: 4.0 },
            coord! { x: 2.0, y: 2.0 },
            coord! { x: 1.0, y: 3.0 },
        ];
        let hull = Geometry::convex_hull(&points);
        assert!(hull.is_valid());
        let Geometry::Polygon(polygon) = &hull else {
            panic!("expected polygon");
        };
        // Closed ring: four corners plus the repeated first vertex.
        assert_eq!(polygon.exterior().0.len(), 5);
        assert_eq!(polygon.unsigned_area(), 16.0);
        assert!(polygon.contains(&Point::new(1.0, 1.0)));
        assert!(!polygon.contains(&Point::new(5.0, 1.0)));
        assert_eq!(
            hull.bounding_rect(),
            Some(Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 4.0, y: 4.0 }))
        );
    }

    #[test]
    fn degenerate_hulls_are_invalid() {
        let p = coord! { x: 1.0, y: 2.0 };
        assert!(Geometry::convex_hull(&[]).is_empty());
        assert!(!Geometry::convex_hull(&[p, p, p, p]).is_valid());
        let collinear = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 1.0, y: 1.0 },
            coord! { x: 3.0, y: 3.0 },
        ];
        assert!(!Geometry::convex_hull(&collinear).is_valid());
        assert_eq!(Geometry::Empty.bounding_rect(), None);
    }
}
