// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Random policy: every requesting input is equally likely to win.

use std::sync::Arc;

use arbsim_track::entity::Entity;
use arbsim_track::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::arbiter::Arbitrate;

pub struct Random {
    rng: StdRng,
}

impl Random {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Arbitrate for Random {
    fn arbitrate(&mut self, entity: &Arc<Entity>, requests: &[bool]) -> Option<usize> {
        let candidates: Vec<usize> = requests
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.then_some(i))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let index = candidates[self.rng.gen_range(0..candidates.len())];
        trace!(entity ; "random: {} candidates, picked {index}", candidates.len());
        Some(index)
    }
}
