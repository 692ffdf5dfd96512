use map_random::prelude::*;
use map_random_examples::{init_tracing, render_shapes_to_png, RenderConfig, ShapeStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let envelope = Envelope::new(0.0, 100.0, 0.0, 100.0, Projection::new("EPSG:3857"))?;
    let generator = ShapeFieldGenerator::new();
    let mut rng = StdRng::seed_from_u64(7);

    // Same grid, two kinds: vertex count is forced by the kind.
    for kind in [ShapeKind::Points, ShapeKind::Lines] {
        let config = ShapeFieldConfig::for_kind(kind)
            .with_divisions(20, 20)
            .with_frequency(0.8);
        let field = generator.generate(&envelope, &config, &mut rng)?;
        println!(
            "{kind}: {} shapes from {} cells",
            field.len(),
            field.cells_considered
        );

        let style = ShapeStyle {
            fill: [235, 180, 60],
            ..ShapeStyle::default()
        };
        let render = RenderConfig::new((800, 800)).with_style(style);
        let out = format!("objects-{kind}.png");
        render_shapes_to_png(&field.shapes, &envelope, &render, out)?;
    }

    Ok(())
}
