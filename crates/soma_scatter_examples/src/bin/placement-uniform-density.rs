use glam::{UVec3, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use soma_scatter::prelude::*;
use soma_scatter_examples::write_pattern_csv;

fn main() -> anyhow::Result<()> {
    // 20x20x20 voxels of 25 um with one density stratum.
    let field = LatticeField::filled(UVec3::splat(20), Vec3::splat(25.0), Vec3::ZERO, 2e4);

    let params = PlacementParameters::new(1.0, 0, 20.0);
    let engine = PlacementEngine::try_new(
        params,
        2000,
        &field,
        &NoInteraction,
        &[],
        &FixedRadius(4.0),
    )?;

    let mut rng = StdRng::seed_from_u64(2026);
    let result = engine.run(&mut rng)?;

    println!(
        "placed {} somata ({} candidates evaluated, {} rejected)",
        result.pattern.len(),
        result.candidates_evaluated,
        result.candidates_rejected
    );

    let out = "placement-uniform-density.csv";
    write_pattern_csv(out, &result.pattern)?;
    println!("wrote {out}");

    Ok(())
}
