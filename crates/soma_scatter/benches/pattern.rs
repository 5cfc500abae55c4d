use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use soma_scatter::pattern::SpherePattern;

const PATTERN_SIZES: [usize; 4] = [100, 1_000, 10_000, 50_000];
const DOMAIN: f32 = 1000.0;
const CUTOFF: f32 = 25.0;

fn random_position(rng: &mut StdRng) -> Vec3 {
    let mut unit = || (rng.next_u32() as f32) / (u32::MAX as f32 + 1.0);
    Vec3::new(unit() * DOMAIN, unit() * DOMAIN, unit() * DOMAIN)
}

fn build_pattern(size: usize, rng: &mut StdRng) -> SpherePattern {
    let mut pattern = SpherePattern::with_cell_size(CUTOFF);
    for _ in 0..size {
        let position = random_position(rng);
        pattern.add(position, 2.0);
    }
    pattern
}

fn pattern_query_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern/is_intersecting");
    for &size in &PATTERN_SIZES {
        let mut rng = StdRng::seed_from_u64(0xBEE5 ^ size as u64);
        let pattern = build_pattern(size, &mut rng);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let p = random_position(&mut rng);
                black_box(pattern.is_intersecting(p, 2.0));
            });
        });
    }
    group.finish();

    let mut group = c.benchmark_group("pattern/nearest_neighbor");
    for &size in &PATTERN_SIZES {
        let mut rng = StdRng::seed_from_u64(0xD157 ^ size as u64);
        let pattern = build_pattern(size, &mut rng);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let p = random_position(&mut rng);
                black_box(pattern.distance_to_nearest_neighbor(p, CUTOFF));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, pattern_query_benches);
criterion_main!(benches);
