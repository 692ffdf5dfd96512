#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, render_shapes_to_png, render_surface_to_png, RenderConfig, ShapeStyle,
};
