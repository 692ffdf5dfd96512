use map_random::prelude::*;
use map_random_examples::{init_tracing, render_surface_to_png};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut rng = StdRng::seed_from_u64(2025);

    // Defaults suit elevation; a higher roughness gives a more broken surface.
    for (name, roughness) in [("smooth", 0.45), ("rough", 0.75)] {
        let config = TerrainConfig::default().with_roughness(roughness);
        let terrain = Terrain::generate(&config, &mut rng)?;
        let grid = terrain.fill_grid(640, 480);
        if let Some((lo, hi)) = grid.min_max() {
            println!("{name}: {lo:.1}..{hi:.1} over {}x{}", grid.columns, grid.rows);
        }
        render_surface_to_png(&grid, format!("terrain-heightmap-{name}.png"))?;
    }

    Ok(())
}
