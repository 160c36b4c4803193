//! Graph generation and walk sampler benchmarks.
//!
//! Generation is measured per network size; both walkers run over one
//! pre-generated network so their cost excludes wiring.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::SmallRng};
use socialwalk_core::{
    ConnectionProfile, DeadEndPolicy, NetworkError, SocialMediaNetwork, WalkConfig,
};

/// Seed used for every generator and walk.
const SEED: u64 = 42;

/// Fraction of male nodes in every benchmark network.
const MALE_RATIO: f64 = 0.4;

/// Network sizes to benchmark.
const NODE_COUNTS: &[usize] = &[500, 2_000, 8_000];

/// Walk lengths to benchmark.
const STEP_COUNTS: &[usize] = &[1_000, 10_000];

fn generation_impl(c: &mut Criterion) -> Result<(), NetworkError> {
    let mut group = c.benchmark_group("generate_graph");
    group.sample_size(10);
    let profile = ConnectionProfile::default();

    for &node_count in NODE_COUNTS {
        let network = SocialMediaNetwork::new(node_count, MALE_RATIO)?;
        group.bench_with_input(
            BenchmarkId::from_parameter(node_count),
            &network,
            |b, network| {
                b.iter(|| {
                    let mut network = network.clone();
                    let mut rng = SmallRng::seed_from_u64(SEED);
                    black_box(network.generate(&profile, &mut rng).map(|(_, g)| g.edge_count()))
                });
            },
        );
    }

    group.finish();
    Ok(())
}

fn walks_impl(c: &mut Criterion) -> Result<(), NetworkError> {
    let mut network = SocialMediaNetwork::new(2_000, MALE_RATIO)?;
    let mut rng = SmallRng::seed_from_u64(SEED);
    network.generate(&ConnectionProfile::default(), &mut rng)?;

    let mut group = c.benchmark_group("walks");
    for &steps in STEP_COUNTS {
        let config = WalkConfig::new(steps).with_dead_end(DeadEndPolicy::Restart);
        group.bench_with_input(BenchmarkId::new("random", steps), &config, |b, config| {
            let mut rng = SmallRng::seed_from_u64(SEED);
            b.iter(|| black_box(network.random_walk(config, &mut rng)));
        });
        group.bench_with_input(
            BenchmarkId::new("metropolis_hastings", steps),
            &config,
            |b, config| {
                let mut rng = SmallRng::seed_from_u64(SEED);
                b.iter(|| black_box(network.metropolis_hastings_walk(config, &mut rng)));
            },
        );
    }

    group.finish();
    Ok(())
}

fn generation(c: &mut Criterion) {
    if let Err(err) = generation_impl(c) {
        panic!("generation benchmark setup failed: {err}");
    }
}

fn walks(c: &mut Criterion) {
    if let Err(err) = walks_impl(c) {
        panic!("walk benchmark setup failed: {err}");
    }
}

criterion_group!(benches, generation, walks);
criterion_main!(benches);
