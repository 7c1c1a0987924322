// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Random traffic driven through a single allocator.
//!
//! A [`TrafficGenerator`] owns four [lanes](crate::lane::Lane), one
//! [allocator](crate::allocator::Allocator) and the clock that resolves it.
//! Each simulated cycle, for every lane in order:
//!
//!  1. an idle lane admits a new packet with the configured probability,
//!  2. the lane's next phit (or `Null`) is popped and its code presented,
//!
//! then the clock ticks and the allocator outputs are sampled. Requests made
//! while another lane holds the output are counted as drops. Finally every
//! lane whose packet is drained goes idle and, if it held the output,
//! releases it.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use arbsim_engine::sim_error;
use arbsim_engine::time::clock::Clock;
use arbsim_engine::types::{SimError, SimResult};
use arbsim_protocols::packet::PacketConfig;
use arbsim_protocols::phit::IDLE_CODE;
use arbsim_track::entity::Entity;
use arbsim_track::{debug, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::allocator::{Allocator, MAX_PORT, NUM_LANES, lane_bit, requests};
use crate::arbiter::PolicyConfig;
use crate::lane::Lane;

/// Mixed into the trial seed to give the random policy its own stream.
const POLICY_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Clone, Debug, PartialEq)]
pub struct TrialConfig {
    pub number_of_cycles: u64,

    /// Probability that an idle lane admits a packet in a cycle.
    pub packet_generation_frequency: f64,

    /// The output port the allocator serves.
    pub this_port: u8,
    pub policy: PolicyConfig,
    pub packet: PacketConfig,

    /// Lanes that are disabled never admit packets.
    pub active_lanes: [bool; NUM_LANES],
    pub seed: u64,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            number_of_cycles: 5000,
            packet_generation_frequency: 0.1,
            this_port: 0,
            policy: PolicyConfig::default(),
            packet: PacketConfig::default(),
            active_lanes: [true; NUM_LANES],
            seed: 0,
        }
    }
}

impl TrialConfig {
    pub fn validate(&self) -> SimResult {
        let frequency = self.packet_generation_frequency;
        if !frequency.is_finite() || !(0.0..=1.0).contains(&frequency) {
            return sim_error!(format!(
                "Packet generation frequency {frequency} is not in [0, 1]"
            ));
        }
        if self.this_port > MAX_PORT {
            return sim_error!(format!(
                "Port {} is out of range (0..={MAX_PORT})",
                self.this_port
            ));
        }
        self.packet.validate()?;
        self.policy.validate(NUM_LANES)
    }
}

/// The counters of one trial.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrialResult {
    pub number_of_cycles: u64,
    pub packet_generation_frequency: f64,
    pub packets_generated: [u64; NUM_LANES],

    /// Headers addressed to this port seen by the allocator.
    pub requests: [u64; NUM_LANES],
    pub grants: [u64; NUM_LANES],
    pub dropped: [u64; NUM_LANES],
}

impl TrialResult {
    #[must_use]
    pub fn total_generated(&self) -> u64 {
        self.packets_generated.iter().sum()
    }

    #[must_use]
    pub fn total_dropped(&self) -> u64 {
        self.dropped.iter().sum()
    }

    #[must_use]
    pub fn total_grants(&self) -> u64 {
        self.grants.iter().sum()
    }
}

impl fmt::Display for TrialResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} cycles @ {}: generated {}, granted {}, dropped {} {:?}",
            self.number_of_cycles,
            self.packet_generation_frequency,
            self.total_generated(),
            self.total_grants(),
            self.total_dropped(),
            self.dropped
        )
    }
}

pub struct TrafficGenerator {
    pub entity: Arc<Entity>,
    config: TrialConfig,
    clock: Clock,
    allocator: Rc<Allocator>,
    lanes: Vec<Lane>,
    rng: StdRng,
    result: TrialResult,
}

impl TrafficGenerator {
    pub fn new(parent: &Arc<Entity>, name: &str, config: TrialConfig) -> Result<Self, SimError> {
        config.validate()?;

        let entity = Arc::new(Entity::new(parent, name));
        let clock = Clock::default();
        let policy = config
            .policy
            .build(NUM_LANES, config.seed ^ POLICY_STREAM)?;
        let allocator =
            Allocator::new_and_register(&clock, &entity, "alloc", config.this_port, policy)?;

        let lanes = config
            .active_lanes
            .iter()
            .enumerate()
            .map(|(i, enabled)| Lane::new(&entity, i, *enabled, config.packet.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        let result = TrialResult {
            number_of_cycles: config.number_of_cycles,
            packet_generation_frequency: config.packet_generation_frequency,
            ..Default::default()
        };

        Ok(Self {
            entity,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            clock,
            allocator,
            lanes,
            result,
        })
    }

    #[must_use]
    pub fn allocator(&self) -> &Rc<Allocator> {
        &self.allocator
    }

    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// The counters accumulated so far.
    #[must_use]
    pub fn result(&self) -> &TrialResult {
        &self.result
    }

    /// Simulate one cycle.
    pub fn step(&mut self) -> SimResult {
        let frequency = self.config.packet_generation_frequency;
        let mut codes = [IDLE_CODE; NUM_LANES];
        for (lane, code) in self.lanes.iter_mut().zip(codes.iter_mut()) {
            if lane.maybe_generate(&mut self.rng, frequency)? {
                self.result.packets_generated[lane.index()] += 1;
            }
            *code = lane.next_phit().arbitration_code();
        }

        self.allocator.present(codes);
        self.clock.tick();
        let outputs = self.allocator.outputs();

        if outputs.hold.count_ones() > 1 {
            return sim_error!(format!("Allocator holds several lanes: {:#06b}", outputs.hold));
        }

        let now = self.clock.tick_now();
        for (lane, requested) in requests(&codes, self.config.this_port).iter().enumerate() {
            if !requested {
                continue;
            }
            self.result.requests[lane] += 1;
            if outputs.is_dropped(lane) {
                self.result.dropped[lane] += 1;
                debug!(self.entity ; "@{now}: lane {lane} dropped, held by {:#06b}", outputs.hold);
            } else if outputs.granted(lane) {
                self.result.grants[lane] += 1;
                trace!(self.entity ; "@{now}: lane {lane} granted");
            }
        }

        for lane in &mut self.lanes {
            if lane.free_if_drained() && self.allocator.hold() == lane_bit(lane.index()) {
                self.allocator.release(lane.index());
            }
        }
        Ok(())
    }

    /// Run the configured number of cycles and return the counters.
    pub fn run(mut self) -> Result<TrialResult, SimError> {
        for _ in 0..self.config.number_of_cycles {
            self.step()?;
        }
        debug!(self.entity ; "{}", self.result);
        Ok(self.result)
    }
}
