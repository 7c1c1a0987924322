// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The arbitration policies an allocator can be built with.

mod fixed_priority;
mod random;
mod round_robin;
mod weighted_round_robin;

pub use fixed_priority::FixedPriority;
pub use random::Random;
pub use round_robin::RoundRobin;
pub use weighted_round_robin::WeightedRoundRobin;
