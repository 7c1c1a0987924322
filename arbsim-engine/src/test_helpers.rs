// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Helpers shared by the tests of the simulation crates.

use arbsim_track::Tracker;
use arbsim_track::builder::{TrackerConfig, setup_tracker};

use crate::engine::Engine;

/// Create an [`Engine`] for a test.
///
/// Logging goes to stderr at the level given
/// by the `ARBSIM_TEST_LOG` environment variable, defaulting to `Warn`.
#[must_use]
pub fn start_test(full_filepath: &str) -> Engine {
    let engine = Engine::new(&test_tracker());
    arbsim_track::debug!(engine.top() ; "start test {full_filepath}");
    engine
}

/// Create the [`Tracker`] used by [`start_test`].
#[must_use]
pub fn test_tracker() -> Tracker {
    let level = std::env::var("ARBSIM_TEST_LOG")
        .ok()
        .and_then(|lvl| lvl.parse::<log::Level>().ok())
        .unwrap_or(log::Level::Warn);
    let config = TrackerConfig {
        level,
        ..Default::default()
    };
    setup_tracker(&config).unwrap()
}
