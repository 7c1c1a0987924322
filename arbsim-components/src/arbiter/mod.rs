// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Arbitration between the lanes requesting the output.
//!
//! A policy is handed one request flag per input and picks at most one of the
//! requesting inputs. Policies carry whatever state they need between calls
//! (a rotating pointer, grant counters, a random number stream) so the same
//! policy object must be used for the whole of a trial.

use std::fmt;
use std::sync::Arc;

use arbsim_engine::sim_error;
use arbsim_engine::types::{SimError, SimResult};
use arbsim_track::entity::Entity;

pub mod policy;

use policy::{FixedPriority, Random, RoundRobin, WeightedRoundRobin};

pub trait Arbitrate {
    /// Returns the index of the granted input, or `None` if nothing requests.
    fn arbitrate(&mut self, entity: &Arc<Entity>, requests: &[bool]) -> Option<usize>;
}

/// Selects the policy an allocator is built with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PolicyConfig {
    FixedPriority,
    #[default]
    RoundRobin,
    Random,
    WeightedRoundRobin(Vec<usize>),
}

impl PolicyConfig {
    pub fn validate(&self, num_inputs: usize) -> SimResult {
        if let PolicyConfig::WeightedRoundRobin(weights) = self {
            if weights.len() != num_inputs {
                return sim_error!(format!(
                    "{} weights given for {num_inputs} inputs",
                    weights.len()
                ));
            }
            if weights.contains(&0) {
                return sim_error!("Weights must be greater than zero");
            }
        }
        Ok(())
    }

    /// Create the policy. `seed` is only used by [`PolicyConfig::Random`].
    pub fn build(&self, num_inputs: usize, seed: u64) -> Result<Box<dyn Arbitrate>, SimError> {
        self.validate(num_inputs)?;
        let policy: Box<dyn Arbitrate> = match self {
            PolicyConfig::FixedPriority => Box::new(FixedPriority::new()),
            PolicyConfig::RoundRobin => Box::new(RoundRobin::new()),
            PolicyConfig::Random => Box::new(Random::new(seed)),
            PolicyConfig::WeightedRoundRobin(weights) => {
                Box::new(WeightedRoundRobin::new(weights.clone(), num_inputs)?)
            }
        };
        Ok(policy)
    }
}

impl fmt::Display for PolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolicyConfig::FixedPriority => write!(f, "Fixed Priority"),
            PolicyConfig::RoundRobin => write!(f, "Round Robin"),
            PolicyConfig::Random => write!(f, "Random"),
            PolicyConfig::WeightedRoundRobin(weights) => {
                let weights: Vec<String> = weights.iter().map(|w| w.to_string()).collect();
                write!(f, "Weighted Round Robin ({})", weights.join(":"))
            }
        }
    }
}
