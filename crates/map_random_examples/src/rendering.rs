//! PNG rendering helpers shared by the example binaries.
use std::path::Path;

use anyhow::Context;
use geo::{BoundingRect, Contains, Coord, Point, Polygon};
use glam::DVec2;
use image::{Rgb, RgbImage};
use map_random::prelude::{Envelope, GeneratedShape, Geometry, SurfaceGrid};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// How shapes are drawn.
#[derive(Clone, Debug)]
pub struct ShapeStyle {
    pub fill: [u8; 3],
    pub outline: [u8; 3],
    /// Radius used for points, in pixels.
    pub point_radius: i32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: [90, 160, 110],
            outline: [235, 235, 235],
            point_radius: 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub background: [u8; 3],
    pub style: ShapeStyle,
    /// Optional attribute whose value shades polygon fills from dark to bright.
    pub shade_by: Option<String>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            background: [26, 26, 26],
            style: ShapeStyle::default(),
            shade_by: None,
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_shade_by(mut self, attribute: impl Into<String>) -> Self {
        self.shade_by = Some(attribute.into());
        self
    }
}

struct Viewport {
    min: DVec2,
    scale: DVec2,
    height: u32,
}

impl Viewport {
    fn new(envelope: &Envelope, (width, height): (u32, u32)) -> Self {
        Self {
            min: DVec2::new(envelope.min_x(), envelope.min_y()),
            scale: DVec2::new(
                f64::from(width) / envelope.width(),
                f64::from(height) / envelope.height(),
            ),
            height,
        }
    }

    /// World to pixel, with Y pointing up in the world and down in the image.
    fn to_pixel(&self, p: Coord<f64>) -> (i32, i32) {
        let local = (DVec2::new(p.x, p.y) - self.min) * self.scale;
        (
            local.x.floor() as i32,
            self.height as i32 - 1 - local.y.floor() as i32,
        )
    }

    fn to_world(&self, x: i32, y: i32) -> Point<f64> {
        let local = DVec2::new(
            f64::from(x) + 0.5,
            f64::from(self.height as i32 - 1 - y) + 0.5,
        );
        let world = self.min + local / self.scale;
        Point::new(world.x, world.y)
    }
}

/// Render shapes generated inside `envelope` to a PNG at `path`.
pub fn render_shapes_to_png(
    shapes: &[GeneratedShape],
    envelope: &Envelope,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (width, height) = config.image_size;
    let mut img = RgbImage::from_pixel(width, height, Rgb(config.background));
    let view = Viewport::new(envelope, config.image_size);
    let shade_range = config
        .shade_by
        .as_deref()
        .and_then(|key| attribute_range(shapes, key));

    for shape in shapes {
        let fill = match (&config.shade_by, shade_range) {
            (Some(key), Some((lo, hi))) => match shape.attributes.get(key) {
                Some(v) => shade(config.style.fill, (v - lo) / (hi - lo).max(f64::EPSILON)),
                None => config.style.fill,
            },
            _ => config.style.fill,
        };

        match &shape.shape.geometry {
            Geometry::Empty => {}
            Geometry::Point(p) => {
                let (cx, cy) = view.to_pixel(p.0);
                fill_disk(&mut img, cx, cy, config.style.point_radius, fill);
            }
            Geometry::Line(line) => {
                let (a, b) = (view.to_pixel(line.start), view.to_pixel(line.end));
                draw_line(&mut img, a, b, config.style.outline);
            }
            Geometry::Polygon(polygon) => {
                fill_polygon(&mut img, &view, polygon, fill);
                for edge in polygon.exterior().lines() {
                    let (a, b) = (view.to_pixel(edge.start), view.to_pixel(edge.end));
                    draw_line(&mut img, a, b, config.style.outline);
                }
            }
        }
    }

    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), shapes = shapes.len(), "wrote shape image");
    Ok(())
}

/// Render a surface grid as a terrain-coloured PNG, one pixel per grid cell.
pub fn render_surface_to_png(grid: &SurfaceGrid, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let (lo, hi) = grid.min_max().context("surface grid is empty")?;
    let width = u32::try_from(grid.columns)?;
    let height = u32::try_from(grid.rows)?;
    let mut img = RgbImage::new(width, height);

    for x in 0..grid.columns {
        for y in 0..grid.rows {
            let Some(v) = grid.get(x, y) else { continue };
            let t = (v - lo) / (hi - lo).max(f64::EPSILON);
            img.put_pixel(x as u32, height - 1 - y as u32, Rgb(elevation_ramp(t)));
        }
    }

    let path = path.as_ref();
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), width, height, "wrote surface image");
    Ok(())
}

fn attribute_range(shapes: &[GeneratedShape], key: &str) -> Option<(f64, f64)> {
    shapes
        .iter()
        .filter_map(|s| s.attributes.get(key).copied())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn shade(base: [u8; 3], t: f64) -> [u8; 3] {
    let k = 0.35 + 0.65 * t.clamp(0.0, 1.0);
    base.map(|c| (f64::from(c) * k).round() as u8)
}

fn elevation_ramp(t: f64) -> [u8; 3] {
    const STOPS: [(f64, [u8; 3]); 5] = [
        (0.0, [20, 60, 140]),
        (0.3, [60, 140, 80]),
        (0.6, [150, 130, 70]),
        (0.85, [120, 110, 100]),
        (1.0, [245, 245, 245]),
    ];
    let t = t.clamp(0.0, 1.0);
    for pair in STOPS.windows(2) {
        let ((t0, c0), (t1, c1)) = (pair[0], pair[1]);
        if t <= t1 {
            let k = (t - t0) / (t1 - t0);
            return [0, 1, 2].map(|i| {
                (f64::from(c0[i]) + (f64::from(c1[i]) - f64::from(c0[i])) * k).round() as u8
            });
        }
    }
    STOPS[STOPS.len() - 1].1
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn fill_disk(img: &mut RgbImage, cx: i32, cy: i32, r: i32, color: [u8; 3]) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}

fn draw_line(img: &mut RgbImage, (x0, y0): (i32, i32), (x1, y1): (i32, i32), color: [u8; 3]) {
    let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
    let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
    let (mut x, mut y, mut err) = (x0, y0, dx + dy);
    loop {
        put(img, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn fill_polygon(img: &mut RgbImage, view: &Viewport, polygon: &Polygon<f64>, color: [u8; 3]) {
    let Some(bounds) = polygon.bounding_rect() else {
        return;
    };
    let (x0, y1) = view.to_pixel(bounds.min());
    let (x1, y0) = view.to_pixel(bounds.max());
    for y in y0.max(0)..=y1.min(img.height() as i32 - 1) {
        for x in x0.max(0)..=x1.min(img.width() as i32 - 1) {
            if polygon.contains(&view.to_world(x, y)) {
                put(img, x, y, color);
            }
        }
    }
}
