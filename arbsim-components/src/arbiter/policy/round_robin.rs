// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Round Robin policy

use std::sync::Arc;

use arbsim_track::entity::Entity;

use crate::arbiter::Arbitrate;

pub struct RoundRobin {
    candidate: usize,
}

impl RoundRobin {
    #[must_use]
    pub fn new() -> Self {
        Self { candidate: 0 }
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}

impl Arbitrate for RoundRobin {
    fn arbitrate(&mut self, _entity: &Arc<Entity>, requests: &[bool]) -> Option<usize> {
        let num_inputs = requests.len();
        for i in 0..num_inputs {
            let index = (i + self.candidate) % num_inputs;
            if requests[index] {
                self.candidate = (index + 1) % num_inputs;
                return Some(index);
            }
        }
        None
    }
}
