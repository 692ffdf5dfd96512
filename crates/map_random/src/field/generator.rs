//! Shape field generation over a jittered grid.
use geo::{Coord, Line, Point};
use rand::RngCore;
use tracing::{debug, warn};

use crate::distribution::rand01;
use crate::error::{Error, Result};
use crate::field::partition::{Cell, GridPartition};
use crate::field::{GeneratedShape, ShapeField, ShapeFieldConfig};
use crate::geometry::{Envelope, Geometry, Projection, Shape};
use crate::notification::Notification;

/// Generates fields of non-overlapping shapes, one per included grid cell.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShapeFieldGenerator;

impl ShapeFieldGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a field of shapes inside `envelope`.
    ///
    /// Cells are visited X-major. Each one is kept with probability `config.frequency`;
    /// kept cells that cannot produce a valid shape within `config.max_attempts` are dropped
    /// with a warning notification. Only invalid configuration is an error.
    pub fn generate<R: RngCore + ?Sized>(
        &self,
        envelope: &Envelope,
        config: &ShapeFieldConfig,
        rng: &mut R,
    ) -> Result<ShapeField> {
        config.validate()?;

        let cells: Vec<Cell> = if config.x_divisions == 1 || config.y_divisions == 1 {
            vec![Cell::from_envelope(envelope)]
        } else {
            let partition = GridPartition::jittered(
                envelope,
                config.x_divisions,
                config.y_divisions,
                config.jitter_spread,
                rng,
            )?;
            partition.cells().collect()
        };

        let mut field = ShapeField::new();
        for (index, cell) in cells.iter().enumerate() {
            field.cells_considered += 1;
            if !include_cell(config.frequency, rng) {
                continue;
            }

            match build_shape(cell, config, envelope.projection(), rng) {
                Ok(shape) => {
                    let name = format!("{}_{}", config.base_name, field.shapes.len() + 1);
                    field.shapes.push(GeneratedShape::new(name, shape));
                }
                Err(err) => {
                    warn!(cell = index, error = %err, "dropping shape cell");
                    field.cells_dropped += 1;
                    field.notifications.push(Notification::warning(
                        format!("{} cell {index}", config.base_name),
                        err.to_string(),
                    ));
                }
            }
        }

        debug!(
            cells = field.cells_considered,
            shapes = field.shapes.len(),
            dropped = field.cells_dropped,
            "generated shape field"
        );
        Ok(field)
    }
}

/// Bernoulli trial; a zero frequency never includes a cell.
fn include_cell<R: RngCore + ?Sized>(frequency: f64, rng: &mut R) -> bool {
    frequency > 0.0 && rand01(rng) <= frequency
}

fn build_shape<R: RngCore + ?Sized>(
    cell: &Cell,
    config: &ShapeFieldConfig,
    projection: &Projection,
    rng: &mut R,
) -> Result<Shape> {
    let geometry = match config.vertices {
        1 => Geometry::Point(Point::from(cell.random_point(rng))),
        2 => random_line(cell, config.max_attempts, rng)?,
        n => random_polygon(cell, n, config.max_attempts, rng)?,
    };
    Ok(Shape::new(geometry, projection.clone()))
}

fn random_line<R: RngCore + ?Sized>(
    cell: &Cell,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Geometry> {
    for _ in 0..max_attempts {
        let a = cell.random_point(rng);
        let b = cell.random_point(rng);
        if a != b {
            return Ok(Geometry::Line(Line::new(a, b)));
        }
    }
    Err(Error::RetryLimitExceeded {
        attempts: max_attempts,
    })
}

fn random_polygon<R: RngCore + ?Sized>(
    cell: &Cell,
    vertices: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Result<Geometry> {
    let mut points: Vec<Coord<f64>> = Vec::new();
    for _ in 0..max_attempts {
        points.clear();
        points.extend((0..vertices).map(|_| cell.random_point(rng)));
        let hull = Geometry::convex_hull(&points);
        if hull.is_valid() {
            return Ok(hull);
        }
    }
    Err(Error::RetryLimitExceeded {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use geo::{Contains, Intersects, Rect};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    struct FixedRng {
        value: u64,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            (self.value >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.value
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for chunk in dst.chunks_mut(8) {
                let bytes = self.value.to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    fn envelope() -> Envelope {
        Envelope::new(-75.2, -72.6, 3.5, 5.3, Projection::default()).unwrap()
    }

    fn bbox(shape: &GeneratedShape) -> Rect<f64> {
        shape
            .shape
            .geometry
            .bounding_rect()
            .expect("non-empty geometry")
    }

    #[test]
    fn points_lie_inside_the_envelope() {
        let env = envelope();
        let config = ShapeFieldConfig::new(8, 8)
            .with_vertices(1)
            .with_frequency(1.0)
            .with_base_name("point");
        let mut rng = StdRng::seed_from_u64(1);
        let field = ShapeFieldGenerator::new()
            .generate(&env, &config, &mut rng)
            .unwrap();
        assert!(!field.is_empty());
        for shape in &field.shapes {
            let Geometry::Point(p) = shape.shape.geometry else {
                panic!("expected point");
            };
            assert!(env.contains(p.0));
            assert_eq!(shape.shape.projection, *env.projection());
        }
    }

    #[test]
    fn polygons_are_valid_and_never_overlap() {
        let env = envelope();
        let config = ShapeFieldConfig::new(5, 4)
            .with_vertices(6)
            .with_frequency(1.0)
            .with_base_name("polygon");
        let mut rng = StdRng::seed_from_u64(7);
        let field = ShapeFieldGenerator::new()
            .generate(&env, &config, &mut rng)
            .unwrap();
        assert_eq!(field.cells_dropped, 0);
        assert_eq!(field.len(), field.cells_considered);
        for (i, a) in field.shapes.iter().enumerate() {
            assert!(a.shape.is_valid(), "{} invalid", a.name);
            let Geometry::Polygon(a_polygon) = &a.shape.geometry else {
                panic!("expected polygon");
            };
            let a_box = bbox(a);
            assert!(env.contains(a_box.min()) && env.contains(a_box.max()));
            for b in &field.shapes[i + 1..] {
                let Geometry::Polygon(b_polygon) = &b.shape.geometry else {
                    panic!("expected polygon");
                };
                assert!(
                    !a_polygon.intersects(b_polygon),
                    "{} overlaps {}",
                    a.name,
                    b.name
                );
            }
        }
    }

    #[test]
    fn lines_have_distinct_endpoints() {
        let config = ShapeFieldConfig::new(4, 4)
            .with_vertices(2)
            .with_frequency(1.0);
        let mut rng = StdRng::seed_from_u64(3);
        let field = ShapeFieldGenerator::new()
            .generate(&envelope(), &config, &mut rng)
            .unwrap();
        assert!(field.shapes.iter().all(|s| match s.shape.geometry {
            Geometry::Line(line) => line.start != line.end,
            _ => false,
        }));
    }

    #[test]
    fn zero_frequency_yields_nothing() {
        for divisions in [1, 6] {
            let config = ShapeFieldConfig::new(divisions, divisions).with_frequency(0.0);
            let mut rng = StdRng::seed_from_u64(11);
            let field = ShapeFieldGenerator::new()
                .generate(&envelope(), &config, &mut rng)
                .unwrap();
            assert!(field.is_empty());
            assert!(field.notifications.is_empty());
        }
    }

    #[test]
    fn single_division_covers_the_whole_envelope_with_one_shape() {
        let env = envelope();
        let config = ShapeFieldConfig::new(1, 1)
            .with_frequency(1.0)
            .with_base_name("polygon");
        let mut rng = StdRng::seed_from_u64(5);
        let field = ShapeFieldGenerator::new()
            .generate(&env, &config, &mut rng)
            .unwrap();
        assert_eq!(field.cells_considered, 1);
        assert_eq!(field.len(), 1);
        assert_eq!(field.shapes[0].name, "polygon_1");
        let bounds = bbox(&field.shapes[0]);
        assert!(env.contains(bounds.min()) && env.contains(bounds.max()));
    }

    #[test]
    fn a_single_row_or_column_collapses_to_one_envelope_cell() {
        let env = envelope();
        for (x_divisions, y_divisions) in [(1, 6), (5, 1)] {
            let config = ShapeFieldConfig::new(x_divisions, y_divisions).with_frequency(1.0);
            let mut rng = StdRng::seed_from_u64(13);
            let field = ShapeFieldGenerator::new()
                .generate(&env, &config, &mut rng)
                .unwrap();
            assert_eq!(field.cells_considered, 1, "{x_divisions}x{y_divisions}");
            assert_eq!(field.len(), 1, "{x_divisions}x{y_divisions}");
            let Geometry::Polygon(polygon) = &field.shapes[0].shape.geometry else {
                panic!("expected polygon");
            };
            assert!(env.rect().contains(polygon));
            // Wider than any one of the nominal columns or rows would allow.
            let bounds = bbox(&field.shapes[0]);
            assert!(
                bounds.width() > env.width() / 5.0 || bounds.height() > env.height() / 6.0,
                "{bounds:?}"
            );
        }
    }

    #[test]
    fn names_are_sequential_from_one() {
        let config = ShapeFieldConfig::new(3, 3)
            .with_frequency(1.0)
            .with_vertices(1)
            .with_base_name("point");
        let mut rng = StdRng::seed_from_u64(21);
        let field = ShapeFieldGenerator::new()
            .generate(&envelope(), &config, &mut rng)
            .unwrap();
        for (i, shape) in field.shapes.iter().enumerate() {
            assert_eq!(shape.name, format!("point_{}", i + 1));
        }
    }

    #[test]
    fn exhausted_retries_drop_the_cell_with_a_warning() {
        // A constant generator places every vertex on the same spot, so no hull is valid.
        let config = ShapeFieldConfig::new(1, 1)
            .with_frequency(1.0)
            .with_vertices(4)
            .with_max_attempts(5);
        let mut rng = FixedRng { value: 0 };
        let field = ShapeFieldGenerator::new()
            .generate(&envelope(), &config, &mut rng)
            .unwrap();
        assert!(field.is_empty());
        assert_eq!(field.cells_dropped, 1);
        assert_eq!(field.notifications.len(), 1);
        assert_eq!(
            field.notifications[0].level,
            crate::notification::Level::Warning
        );
        assert!(field.notifications[0].message.contains("5 attempts"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let config = ShapeFieldConfig::new(0, 4);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            ShapeFieldGenerator::new().generate(&envelope(), &config, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let config = ShapeFieldConfig::default();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            ShapeFieldGenerator::new()
                .generate(&envelope(), &config, &mut rng)
                .unwrap()
                .shapes
        };
        assert_eq!(run(99), run(99));
    }
}
