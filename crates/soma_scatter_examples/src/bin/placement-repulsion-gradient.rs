use glam::{UVec3, Vec3};
use rand::rngs::StdRng;
use rand::rand_core::RngCore;
use rand::SeedableRng;
use soma_scatter::prelude::*;
use soma_scatter_examples::write_pattern_csv;

fn main() -> anyhow::Result<()> {
    // Density ramps linearly along x, so the left face stays sparse and the
    // right face packs tight.
    let shape = UVec3::new(16, 8, 8);
    let mut data = Vec::with_capacity(16 * 8 * 8);
    for _z in 0..shape.z {
        for _y in 0..shape.y {
            for x in 0..shape.x {
                data.push(4e3 * (x as f32 + 1.0));
            }
        }
    }
    let field = LatticeField::new(shape, Vec3::splat(25.0), Vec3::ZERO, data)?;

    // A pre-existing obstacle the placement must route around.
    let obstacles = SphereObstacles::from(vec![(Vec3::new(250.0, 100.0, 100.0), 40.0)]);
    let indexes: [&dyn StaticSpatialIndex; 1] = [&obstacles];

    // Radii drawn uniformly from [2, 4] um.
    let radius = |rng: &mut dyn RngCore| 2.0 + (rng.next_u32() as f32 / (u32::MAX as f32 + 1.0)) * 2.0;

    let energy = InversePowerPotential::new(1.0, 2.0);
    let params = PlacementParameters::new(2.0, 10, 30.0).with_initial_sample_size(20);
    let engine = PlacementEngine::try_new(params, 500, &field, &energy, &indexes, &radius)?;

    let mut warnings = 0usize;
    let mut sink = FnSink::new(|event| {
        if let PlacementEvent::Warning { context, message } = event {
            warnings += 1;
            eprintln!("warning [{context}]: {message}");
        }
    });

    let mut rng = StdRng::seed_from_u64(7);
    let result = engine.run_flat_with_events(&mut rng, &mut sink)?;

    println!(
        "placed {} somata with {} warnings ({} candidates rejected)",
        result.pattern.len(),
        warnings,
        result.candidates_rejected
    );

    let out = "placement-repulsion-gradient.csv";
    write_pattern_csv(out, &result.pattern)?;
    println!("wrote {out}");

    Ok(())
}
