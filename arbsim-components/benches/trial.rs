// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

/// Benchmark the cycle loop of a single trial.
use arbsim_components::arbiter::PolicyConfig;
use arbsim_components::test_helpers::saturated_config;
use arbsim_components::traffic::{TrafficGenerator, TrialConfig};
use arbsim_engine::engine::Engine;
use arbsim_track::tracker::dev_null_tracker;
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

fn create_engine() -> Engine {
    // Create an engine without the tracker system writing any log messages
    let tracker = dev_null_tracker();
    Engine::new(&tracker)
}

fn build_trial(config: TrialConfig) -> TrafficGenerator {
    let engine = create_engine();
    TrafficGenerator::new(engine.top(), "trial", config).unwrap()
}

fn run_trial(generator: TrafficGenerator) {
    generator.run().unwrap();
}

fn bench_trials(c: &mut Criterion) {
    let mut group = c.benchmark_group("trial");

    group.bench_function("random_traffic_round_robin", |b| {
        b.iter_batched(
            || {
                build_trial(TrialConfig {
                    number_of_cycles: 10_000,
                    packet_generation_frequency: 0.3,
                    ..Default::default()
                })
            },
            run_trial,
            BatchSize::SmallInput,
        );
    });

    group.bench_function("saturated_weighted_round_robin", |b| {
        b.iter_batched(
            || {
                build_trial(saturated_config(
                    PolicyConfig::WeightedRoundRobin(vec![4, 2, 1, 1]),
                    10_000,
                ))
            },
            run_trial,
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_trials
}
criterion_main!(benches);
