// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Experiments over the single-port output allocator.
//!
//! An experiment sweeps either the number of simulated cycles or the packet
//! generation frequency, runs a number of independently seeded trials at
//! every point on a [rayon] thread pool and reduces them to one
//! [`AggregateRow`](report::AggregateRow) per point. The rows are written as
//! CSV for plotting elsewhere.
//!
//! ```
//! use arbsim_engine::engine::Engine;
//! use arbsim_harness::experiment::{ExperimentConfig, run_experiment};
//! use arbsim_harness::sweep::SweepStrategy;
//! use arbsim_track::tracker::dev_null_tracker;
//!
//! let engine = Engine::new(&dev_null_tracker());
//! let config = ExperimentConfig {
//!     sweep: SweepStrategy::Cycles {
//!         start: 100,
//!         end: 300,
//!         step: 100,
//!         frequency: 0.2,
//!     },
//!     total_iterations: 2,
//!     ..Default::default()
//! };
//! let rows = run_experiment(engine.top(), &config).unwrap();
//! assert_eq!(rows.len(), 3);
//! ```

pub mod config;
pub mod error;
pub mod experiment;
pub mod report;
pub mod sweep;
