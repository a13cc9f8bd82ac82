//! Benchmarks for the tick loop and the grid's hot paths.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use forage::sim::SimRng;
use forage::{EntityKind, Position, SimConfig, Simulation, SpatialGrid, run_batch};
use rand::SeedableRng;

fn bench_default_ticks(c: &mut Criterion) {
    let config = SimConfig::default();

    c.bench_function("tick_default_150x150", |b| {
        b.iter_batched(
            || Simulation::new(config).unwrap_or_else(|e| panic!("invalid config: {e}")),
            |mut sim| {
                for _ in 0..10 {
                    black_box(sim.step());
                }
                sim
            },
            criterion::BatchSize::LargeInput,
        );
    });
}

fn bench_neighbour_scan(c: &mut Criterion) {
    let config = SimConfig::default();
    let sim = Simulation::new(config).unwrap_or_else(|e| panic!("invalid config: {e}"));
    let grid = sim.grid();
    let centre = Position::new(75, 75);

    c.bench_function("neighbours_of_kind_r5", |b| {
        b.iter(|| black_box(grid.neighbours_of_kind(black_box(centre), 5, EntityKind::Food)));
    });
}

fn bench_free_pool(c: &mut Criterion) {
    c.bench_function("take_free_position_drain_64x64", |b| {
        b.iter_batched(
            || SpatialGrid::new(64, &mut SimRng::seed_from_u64(1)),
            |grid| {
                let Some(grid) = grid else { return 0 };
                let mut n = 0;
                while grid.take_free_position().is_some() {
                    n += 1;
                }
                n
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_batch(c: &mut Criterion) {
    let config = SimConfig {
        grid_size: 60,
        initial_agents: 300,
        ..SimConfig::default()
    };
    let seeds: Vec<u64> = (0..8).collect();

    let mut group = c.benchmark_group("batch");
    group.sample_size(10);
    group.bench_function("batch_8x100_ticks", |b| {
        b.iter(|| black_box(run_batch(config, black_box(&seeds), 100, |_| {})));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_default_ticks,
    bench_neighbour_scan,
    bench_free_pool,
    bench_batch
);
criterion_main!(benches);
