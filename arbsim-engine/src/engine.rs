// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The simulation engine.
//!
//! The engine owns the top-level [`Entity`] of a simulation and the
//! [`Tracker`] it logs through. Each trial builds and drives its own
//! [`Clock`](crate::time::clock::Clock).

use std::sync::Arc;

use arbsim_track::Tracker;
use arbsim_track::entity::{Entity, toplevel};

pub struct Engine {
    top: Arc<Entity>,
}

impl Engine {
    #[must_use]
    pub fn new(tracker: &Tracker) -> Self {
        Self {
            top: toplevel(tracker, "top"),
        }
    }

    #[must_use]
    pub fn top(&self) -> &Arc<Entity> {
        &self.top
    }

    /// Flush the tracker once the simulation has completed.
    pub fn shutdown(&self) {
        self.top.tracker.shutdown();
    }
}
