use std::sync::Arc;

use map_random::prelude::*;
use map_random_examples::{init_tracing, render_shapes_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A small geographic window, in degrees.
    let envelope = Envelope::new(-75.2, -72.6, 3.5, 5.3, Projection::default())?;
    let context = GenerationContext::new().with_envelope(envelope.clone());

    // Seeded catalog so attribute draws repeat between runs.
    let dispatcher = GenerationDispatcher::new(Arc::new(DistributionCatalog::with_seed(2025)));
    let mut rng = StdRng::seed_from_u64(2025);

    let urn = "klab:random:objects:polygons#xdivs=12&ydivs=9&fraction=0.7&vertices=7\
               &height=gaussian(120,40)&cover=beta(2,5)";
    let output = dispatcher.dispatch_urn(urn, &context, &mut rng);
    for notification in &output.notifications {
        println!("{notification}");
    }

    let shapes = output.shapes();
    println!("{} polygons", shapes.len());
    if let Some(first) = shapes.first() {
        println!("{}: {:?}", first.name, first.attributes);
    }

    let config = RenderConfig::new((1040, 720)).with_shade_by("height");
    render_shapes_to_png(shapes, &envelope, &config, "objects-polygons-field.png")?;

    Ok(())
}
