// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Simulation components.
//!
//! The [allocator] decides which lane may use the output each cycle using one
//! of the [arbiter] policies. The [traffic] driver feeds it from four
//! [lanes](lane) of random packets and counts what gets dropped.

pub mod allocator;
pub mod arbiter;
pub mod lane;
pub mod test_helpers;
pub mod traffic;
