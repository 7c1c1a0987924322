// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The output allocator of one router port.
//!
//! Each cycle the allocator sees one [arbitration
//! code](arbsim_protocols::phit::Phit::arbitration_code) per lane. A lane
//! requests this output when its code carries a header addressed to this
//! port. With the output free the [policy](crate::arbiter::Arbitrate) picks
//! one requester, which then holds the output until its packet has been
//! transferred and the driver [releases](Allocator::release) it. Every other
//! request made while the output is held is dropped.
//!
//! # Outputs
//!
//! All outputs are 4-bit lane masks:
//!  - `select`: the lane whose phits pass through to the output.
//!  - `shift`: the lane granted on this edge. Zero when no new grant is made.
//!  - `hold`: the reservation. At most one bit is ever set.
//!
//! # Timing
//!
//! [`Allocator`] follows the clock-edge contract: codes are
//! [presented](Allocator::present) during a cycle, the decision is taken when
//! the clock [resolves](arbsim_engine::traits::Resolve) the allocator, and the
//! [outputs](Allocator::outputs) are sampled after the edge.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use arbsim_engine::sim_error;
use arbsim_engine::time::clock::Clock;
use arbsim_engine::traits::{Resolve, Resolver};
use arbsim_engine::types::SimError;
use arbsim_protocols::phit::{IDLE_CODE, requested_port};
use arbsim_track::entity::Entity;
use arbsim_track::{debug, trace};

use crate::arbiter::Arbitrate;

/// Number of lanes competing for the output.
pub const NUM_LANES: usize = 4;

/// Largest port identity an allocator can be given.
pub const MAX_PORT: u8 = NUM_LANES as u8 - 1;

/// The one-hot mask of a lane.
#[must_use]
pub fn lane_bit(lane: usize) -> u8 {
    1 << lane
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocatorOutputs {
    pub select: u8,
    pub shift: u8,
    pub hold: u8,
}

impl AllocatorOutputs {
    /// True if `lane` was granted the output on this edge.
    #[must_use]
    pub fn granted(&self, lane: usize) -> bool {
        self.shift & lane_bit(lane) != 0
    }

    /// True if a request made by `lane` on this edge is dropped.
    #[must_use]
    pub fn is_dropped(&self, lane: usize) -> bool {
        self.hold != 0 && self.hold != lane_bit(lane)
    }
}

/// Returns which lanes present a header addressed to `this_port`.
#[must_use]
pub fn requests(codes: &[u8; NUM_LANES], this_port: u8) -> [bool; NUM_LANES] {
    codes.map(|code| requested_port(code) == Some(this_port))
}

/// Compute the outputs of one clock edge.
///
/// `hold` is the reservation carried in from the previous edge. While it is
/// set no arbitration takes place and the policy is left untouched.
pub fn allocate(
    entity: &Arc<Entity>,
    codes: &[u8; NUM_LANES],
    this_port: u8,
    hold: u8,
    policy: &mut dyn Arbitrate,
) -> AllocatorOutputs {
    if hold != 0 {
        return AllocatorOutputs {
            select: hold,
            shift: 0,
            hold,
        };
    }

    let requests = requests(codes, this_port);
    match policy.arbitrate(entity, &requests) {
        Some(winner) if requests.get(winner) == Some(&true) => {
            let bit = lane_bit(winner);
            AllocatorOutputs {
                select: bit,
                shift: bit,
                hold: bit,
            }
        }
        _ => AllocatorOutputs::default(),
    }
}

pub struct Allocator {
    pub entity: Arc<Entity>,
    this_port: u8,
    codes: Cell<[u8; NUM_LANES]>,
    hold: Cell<u8>,
    outputs: Cell<AllocatorOutputs>,
    policy: RefCell<Box<dyn Arbitrate>>,
}

impl Allocator {
    pub fn new_and_register(
        clock: &Clock,
        parent: &Arc<Entity>,
        name: &str,
        this_port: u8,
        policy: Box<dyn Arbitrate>,
    ) -> Result<Rc<Self>, SimError> {
        if this_port > MAX_PORT {
            return sim_error!(format!(
                "Allocator port {this_port} is out of range (0..={MAX_PORT})"
            ));
        }
        let rc_self = Rc::new(Self {
            entity: Arc::new(Entity::new(parent, name)),
            this_port,
            codes: Cell::new([IDLE_CODE; NUM_LANES]),
            hold: Cell::new(0),
            outputs: Cell::new(AllocatorOutputs::default()),
            policy: RefCell::new(policy),
        });
        clock.add_resolve(rc_self.clone());
        Ok(rc_self)
    }

    #[must_use]
    pub fn this_port(&self) -> u8 {
        self.this_port
    }

    /// Drive the arbitration codes for the coming edge.
    pub fn present(&self, codes: [u8; NUM_LANES]) {
        self.codes.set(codes);
    }

    /// The outputs computed on the last edge.
    #[must_use]
    pub fn outputs(&self) -> AllocatorOutputs {
        self.outputs.get()
    }

    #[must_use]
    pub fn hold(&self) -> u8 {
        self.hold.get()
    }

    /// Free the output if `lane` holds it.
    pub fn release(&self, lane: usize) {
        if self.hold.get() == lane_bit(lane) {
            debug!(self.entity ; "release lane {lane}");
            self.hold.set(0);
        }
    }
}

impl Resolve for Allocator {
    fn resolve(&self) {
        let codes = self.codes.get();
        let mut policy = self.policy.borrow_mut();
        let outputs = allocate(
            &self.entity,
            &codes,
            self.this_port,
            self.hold.get(),
            &mut **policy,
        );
        if outputs.shift != 0 {
            trace!(self.entity ; "codes {codes:?}: grant {:#06b}", outputs.shift);
        }
        self.hold.set(outputs.hold);
        self.outputs.set(outputs);
    }
}

#[cfg(test)]
mod tests {
    use arbsim_engine::test_helpers::start_test;

    use super::*;
    use crate::arbiter::policy::{FixedPriority, RoundRobin};

    const REQ_PORT0: u8 = 0b1100;
    const REQ_PORT1: u8 = 0b1101;

    #[test]
    fn requests_match_port() {
        let codes = [REQ_PORT0, REQ_PORT1, IDLE_CODE, 0b1000];
        assert_eq!(requests(&codes, 0), [true, false, false, false]);
        assert_eq!(requests(&codes, 1), [false, true, false, false]);
    }

    #[test]
    fn no_request_no_grant() {
        let engine = start_test(file!());
        let mut policy = RoundRobin::new();
        let codes = [REQ_PORT1; NUM_LANES];
        let outputs = allocate(engine.top(), &codes, 0, 0, &mut policy);
        assert_eq!(outputs, AllocatorOutputs::default());
    }

    #[test]
    fn hold_blocks_arbitration() {
        let engine = start_test(file!());
        let mut policy = FixedPriority::new();
        let codes = [REQ_PORT0; NUM_LANES];
        let outputs = allocate(engine.top(), &codes, 0, 0b0100, &mut policy);
        assert_eq!(
            outputs,
            AllocatorOutputs {
                select: 0b0100,
                shift: 0,
                hold: 0b0100
            }
        );
        assert!(outputs.is_dropped(0));
        assert!(!outputs.is_dropped(2));
        assert!(!outputs.granted(2));
    }

    #[test]
    fn port_out_of_range() {
        let engine = start_test(file!());
        let clock = Clock::default();
        let policy = Box::new(RoundRobin::new());
        let result = Allocator::new_and_register(&clock, engine.top(), "alloc", 4, policy);
        assert!(result.is_err());
    }
}
