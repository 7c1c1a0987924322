// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Weighted Round Robin policy
//!
//! The pointer moves past every granted input, but an input that has not yet
//! used up its weight is preferred over one that has. Once all requesting
//! inputs have used their weight the first of them in pointer order wins and
//! its count starts again.

use std::sync::Arc;

use arbsim_engine::sim_error;
use arbsim_engine::types::SimError;
use arbsim_track::entity::Entity;
use arbsim_track::trace;

use crate::arbiter::Arbitrate;

pub struct WeightedRoundRobin {
    candidate: usize,
    grants: Vec<usize>,
    weights: Vec<usize>,
}

impl WeightedRoundRobin {
    pub fn new(weights: Vec<usize>, num_inputs: usize) -> Result<Self, SimError> {
        if weights.len() != num_inputs {
            return sim_error!("The number of weights must be equal to the number of inputs");
        }

        Ok(Self {
            candidate: 0,
            grants: vec![0; weights.len()],
            weights,
        })
    }

    pub fn state_str(&self, requests: &[bool]) -> String {
        let mut s = String::new();
        s.push_str(format!("{}: ", self.candidate).as_str());
        for (i, grant) in self.grants.iter().enumerate() {
            let req = if requests[i] { "r" } else { "-" };
            s.push_str(format!("{}/{}/{}, ", req, grant, self.weights[i]).as_str());
        }
        s
    }
}

impl Arbitrate for WeightedRoundRobin {
    fn arbitrate(&mut self, entity: &Arc<Entity>, requests: &[bool]) -> Option<usize> {
        trace!(entity ; "wrr: arbitrate {}", self.state_str(requests));

        let num_inputs = requests.len();
        let mut selected_candidate = None;
        for i in 0..num_inputs {
            let index = (i + self.candidate) % num_inputs;
            if !requests[index] {
                continue;
            }
            if self.weights[index] > self.grants[index] {
                selected_candidate = Some(index);
                break;
            } else if selected_candidate.is_none() {
                selected_candidate = Some(index);
            }
        }

        let index = selected_candidate?;
        if self.weights[index] == self.grants[index] {
            self.grants[index] = 0;
        }
        self.grants[index] += 1;
        self.candidate = (index + 1) % num_inputs;
        Some(index)
    }
}
