//! Criterion benchmarks for the sunlight policy.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use umbra::core::astronomy::Illumination;
use umbra::core::types::CellPos;
use umbra::entity::Agent;
use umbra::sunlight::{estimate_exposure, ShelterPolicy};
use umbra::world::{GridMap, Terrain};
use umbra::SunlightConfig;

/// 64x64 open ground with a walled, roofed compound in one corner.
fn walled_compound() -> GridMap {
    let mut map = GridMap::open(64, 64);
    let walls = (4..20).flat_map(|x| [CellPos::new(x, 4), CellPos::new(x, 19)]);
    let sides = (4..20).flat_map(|z| [CellPos::new(4, z), CellPos::new(19, z)]);
    map.paint(walls.chain(sides), Terrain::Wall);
    map.paint(
        (5..19).flat_map(|z| (5..19).map(move |x| CellPos::new(x, z))),
        Terrain::Floor,
    );
    map.paint([CellPos::new(19, 12)], Terrain::Door);
    map.with_illumination(Illumination::FULL)
}

/// Benchmark: evaluate agents scattered across the open ground at noon.
fn bench_evaluate_agents_noon(c: &mut Criterion) {
    let map = walled_compound();
    let policy = ShelterPolicy::default();
    let agents: Vec<Agent> = (0..32)
        .map(|i| Agent::new(format!("agent-{i}"), CellPos::new(24 + i % 40, 2 + (i * 7) % 60)))
        .collect();

    c.bench_function("evaluate_32_agents_noon", |b| {
        b.iter(|| {
            for (tick, agent) in agents.iter().enumerate() {
                black_box(policy.evaluate_agent(&map, agent, tick as u64));
            }
        });
    });
}

/// Benchmark: agents heading home from the far corner.
fn bench_evaluate_with_home(c: &mut Criterion) {
    let map = walled_compound();
    let policy = ShelterPolicy::default();
    let agent = Agent::new("runner", CellPos::new(60, 60)).with_home_point(CellPos::new(10, 10));

    c.bench_function("evaluate_far_home", |b| {
        b.iter(|| black_box(policy.evaluate_agent(&map, &agent, 1)));
    });
}

/// Benchmark: exposure walk across the whole map.
fn bench_exposure_walk(c: &mut Criterion) {
    let map = walled_compound();
    let config = SunlightConfig::default();
    let agent = Agent::new("walker", CellPos::new(63, 63));

    c.bench_function("exposure_walk_corner_to_compound", |b| {
        b.iter(|| black_box(estimate_exposure(&map, CellPos::new(12, 12), &agent, &config)));
    });
}

criterion_group!(
    benches,
    bench_evaluate_agents_noon,
    bench_evaluate_with_home,
    bench_exposure_walk
);
criterion_main!(benches);
