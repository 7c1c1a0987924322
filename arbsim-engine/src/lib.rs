// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! `arbsim-engine` - the cycle-stepped core of the allocator simulation.
//!
//! Unlike an event-driven engine, every model built on this crate advances in
//! lock-step with a single [clock](crate::time::clock::Clock). Components that
//! model synchronous logic implement [`Resolve`](crate::traits::Resolve) and
//! are registered with the clock; a driver presents their inputs, calls
//! [`tick`](crate::time::clock::Clock::tick), and then samples their outputs.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use arbsim_engine::time::clock::Clock;
//! use arbsim_engine::traits::{Resolve, Resolver};
//!
//! struct Register {
//!     d: Cell<u32>,
//!     q: Cell<u32>,
//! }
//!
//! impl Resolve for Register {
//!     fn resolve(&self) {
//!         self.q.set(self.d.get());
//!     }
//! }
//!
//! let clock = Clock::default();
//! let reg = Rc::new(Register { d: Cell::new(0), q: Cell::new(0) });
//! clock.add_resolve(reg.clone());
//!
//! reg.d.set(7);
//! assert_eq!(reg.q.get(), 0);
//! clock.tick();
//! assert_eq!(reg.q.get(), 7);
//! ```

pub mod engine;
pub mod test_helpers;
pub mod time;
pub mod traits;
pub mod types;
