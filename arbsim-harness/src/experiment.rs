// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Run every trial of an experiment on a thread pool.
//!
//! An experiment visits each point of a [sweep](crate::sweep::SweepStrategy)
//! and runs `total_iterations` independent trials there. Every trial builds
//! its own [`TrafficGenerator`] on the worker thread that runs it, seeded
//! from `(base_seed, point index, iteration)`, so the results do not depend
//! on how many threads are used or on the order in which trials finish.

use std::sync::Arc;

use arbsim_components::allocator::{MAX_PORT, NUM_LANES};
use arbsim_components::arbiter::PolicyConfig;
use arbsim_components::traffic::{TrafficGenerator, TrialConfig, TrialResult};
use arbsim_engine::sim_error;
use arbsim_engine::types::{SimError, SimResult};
use arbsim_protocols::packet::PacketConfig;
use arbsim_track::entity::Entity;
use arbsim_track::{debug, info};
use rayon::prelude::*;

use crate::error::HarnessError;
use crate::report::{AggregateRow, aggregate};
use crate::sweep::{SweepPoint, SweepStrategy};

#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentConfig {
    pub sweep: SweepStrategy,

    /// Number of trials run at each sweep point.
    pub total_iterations: usize,
    pub base_seed: u64,
    pub policy: PolicyConfig,
    pub this_port: u8,
    pub packet: PacketConfig,
    pub active_lanes: [bool; NUM_LANES],

    /// Worker threads. Zero lets the pool choose.
    pub num_threads: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            sweep: SweepStrategy::default(),
            total_iterations: 10,
            base_seed: 0,
            policy: PolicyConfig::default(),
            this_port: 0,
            packet: PacketConfig::default(),
            active_lanes: [true; NUM_LANES],
            num_threads: 0,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> SimResult {
        if self.total_iterations == 0 {
            return sim_error!("At least one iteration is required");
        }
        if self.this_port > MAX_PORT {
            return sim_error!(format!(
                "Port {} is out of range (0..={MAX_PORT})",
                self.this_port
            ));
        }
        self.packet.validate()?;
        self.policy.validate(NUM_LANES)?;
        self.sweep.points()?;
        Ok(())
    }

    /// The configuration of one trial at `point`.
    #[must_use]
    pub fn trial_config(&self, point: &SweepPoint, seed: u64) -> TrialConfig {
        TrialConfig {
            number_of_cycles: point.number_of_cycles,
            packet_generation_frequency: point.packet_generation_frequency,
            this_port: self.this_port,
            policy: self.policy.clone(),
            packet: self.packet.clone(),
            active_lanes: self.active_lanes,
            seed,
        }
    }
}

/// Derive the seed of one trial.
///
/// The indices are mixed into the base seed and passed through the SplitMix64
/// finaliser so that neighbouring trials get unrelated streams.
#[must_use]
pub fn trial_seed(base_seed: u64, point_index: usize, iteration: usize) -> u64 {
    let mut z = base_seed
        ^ (point_index as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (iteration as u64).wrapping_mul(0xd1b5_4a32_d192_ed03);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

pub fn rayon_pool(num_threads: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
}

/// The raw results of every trial, grouped by sweep point in sweep order and
/// by iteration within a point.
pub fn run_trials(
    parent: &Arc<Entity>,
    config: &ExperimentConfig,
) -> Result<Vec<(SweepPoint, Vec<TrialResult>)>, HarnessError> {
    config.validate()?;
    let points = config.sweep.points()?;
    let iterations = config.total_iterations;

    let entity = Arc::new(Entity::new(parent, "experiment"));
    info!(entity ; "{} points x {iterations} iterations, {} on port {}",
        points.len(), config.policy, config.this_port);

    let jobs: Vec<(usize, usize)> = (0..points.len())
        .flat_map(|p| (0..iterations).map(move |i| (p, i)))
        .collect();

    let pool = rayon_pool(config.num_threads)?;
    let results: Vec<TrialResult> = pool.install(|| {
        jobs.par_iter()
            .map(|&(p, i)| -> Result<TrialResult, SimError> {
                let trial_config = config.trial_config(&points[p], trial_seed(config.base_seed, p, i));
                let name = format!("trial{p}_{i}");
                let result = TrafficGenerator::new(&entity, &name, trial_config)?.run()?;
                debug!(entity ; "{name}: {result}");
                Ok(result)
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    Ok(points
        .into_iter()
        .zip(results.chunks(iterations).map(<[TrialResult]>::to_vec))
        .collect())
}

/// Run the experiment and reduce it to one row per sweep point.
pub fn run_experiment(
    parent: &Arc<Entity>,
    config: &ExperimentConfig,
) -> Result<Vec<AggregateRow>, HarnessError> {
    let rows: Vec<AggregateRow> = run_trials(parent, config)?
        .iter()
        .map(|(point, results)| aggregate(point, &config.policy, results))
        .collect();

    for row in &rows {
        info!(parent ; "{} cycles @ {:.3}: {:.1} generated, {:.2} dropped on average {:?}",
            row.number_of_cycles,
            row.packet_generation_frequency,
            row.total_packets_generated,
            row.average_dropped,
            row.average_lane_dropped());
    }
    Ok(rows)
}
