// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The protocols seen by the allocator.
//!
//! [`phit`] defines the 18-bit framing unit and the arbitration code derived
//! from it. [`packet`] groups phits into packets and generates random
//! traffic.

pub mod packet;
pub mod phit;
