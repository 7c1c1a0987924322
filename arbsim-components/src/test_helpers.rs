// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Configurations and runners shared by the tests and benchmarks.

use arbsim_engine::engine::Engine;
use arbsim_protocols::packet::PacketConfig;

use crate::allocator::NUM_LANES;
use crate::arbiter::PolicyConfig;
use crate::traffic::{TrafficGenerator, TrialConfig, TrialResult};

/// Header-only packets, all addressed to port 0.
#[must_use]
pub fn header_only_to_port0() -> PacketConfig {
    PacketConfig {
        min_payload_bits: 0,
        max_payload_bits: 0,
        destination: Some(0),
        ..Default::default()
    }
}

/// Every lane offers a new header for port 0 every cycle.
///
/// Each grant is released in the same cycle so the allocator arbitrates on
/// every edge.
#[must_use]
pub fn saturated_config(policy: PolicyConfig, number_of_cycles: u64) -> TrialConfig {
    TrialConfig {
        number_of_cycles,
        packet_generation_frequency: 1.0,
        this_port: 0,
        policy,
        packet: header_only_to_port0(),
        active_lanes: [true; NUM_LANES],
        seed: 0,
    }
}

/// Build and run a trial under the engine's top-level entity.
pub fn run_trial(engine: &Engine, name: &str, config: TrialConfig) -> TrialResult {
    let generator = TrafficGenerator::new(engine.top(), name, config).unwrap();
    generator.run().unwrap()
}
