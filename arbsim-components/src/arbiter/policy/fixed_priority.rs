// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Fixed Priority policy: the lowest numbered requesting input always wins.

use std::sync::Arc;

use arbsim_track::entity::Entity;

use crate::arbiter::Arbitrate;

#[derive(Default)]
pub struct FixedPriority;

impl FixedPriority {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Arbitrate for FixedPriority {
    fn arbitrate(&mut self, _entity: &Arc<Entity>, requests: &[bool]) -> Option<usize> {
        requests.iter().position(|r| *r)
    }
}
