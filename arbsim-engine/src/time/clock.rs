// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! This module represents the time during a simulation.
//!
//! Time is a count of clock edges. Every call to [`Clock::tick`] models one
//! rising edge: all registered [`Resolve`] components latch their inputs and
//! compute their new state, and then the tick count advances.

use core::cmp::Ordering;
use std::cell::RefCell;
use std::rc::Rc;

use crate::traits::{Resolve, Resolver};

/// ClockTick structure for representing a number of Clock ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockTick {
    /// Clock ticks.
    tick: u64,
}

impl ClockTick {
    #[must_use]
    pub fn new() -> Self {
        Self { tick: 0 }
    }

    /// Get the current clock tick.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

impl Ord for ClockTick {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tick.cmp(&other.tick)
    }
}

impl PartialOrd for ClockTick {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for ClockTick {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tick)
    }
}

/// Shared state between the users of a Clock and the Clock itself.
pub struct ClockState {
    now: RefCell<ClockTick>,

    /// Components resolved on every edge, in registration order.
    to_resolve: RefCell<Vec<Rc<dyn Resolve>>>,
}

impl ClockState {
    fn resolve(&self) {
        for r in self.to_resolve.borrow().iter() {
            r.resolve();
        }
    }
}

#[derive(Clone)]
/// State representing a clock.
///
/// Clones share the same tick count and the same registered components.
pub struct Clock {
    shared_state: Rc<ClockState>,
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        let shared_state = Rc::new(ClockState {
            now: RefCell::new(ClockTick::new()),
            to_resolve: RefCell::new(Vec::new()),
        });
        Self { shared_state }
    }

    /// Returns the current [ClockTick].
    #[must_use]
    pub fn tick_now(&self) -> ClockTick {
        *self.shared_state.now.borrow()
    }

    /// Model a single rising edge of the clock.
    ///
    /// Inputs presented before this call are seen by the registered
    /// components; their outputs must only be sampled after it returns.
    pub fn tick(&self) {
        self.shared_state.resolve();
        self.shared_state.now.borrow_mut().tick += 1;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for Clock {
    fn add_resolve(&self, resolve: Rc<dyn Resolve + 'static>) {
        self.shared_state.to_resolve.borrow_mut().push(resolve);
    }
}
