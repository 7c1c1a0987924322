// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Sweep random traffic through a single-port output allocator and record
//! how many packets each lane loses.
//!
//! # Examples
//!
//! Sweep the generation frequency with the fixed priority policy:
//! ```text
//!   ./target/release/arbsim --policy fixed-priority --output fp.csv
//! ```
//!
//! Sweep the number of cycles, printing the CSV to stdout and every drop of
//! lane 3 to stderr:
//! ```text
//!   ./target/release/arbsim --sweep cycles --log-level debug \
//!       --log-filter-regex 'lane3' --output -
//! ```

use arbsim_engine::engine::Engine;
use arbsim_engine::types::SimError;
use arbsim_harness::config::Config;
use arbsim_harness::error::HarnessError;
use arbsim_harness::experiment::run_experiment;
use arbsim_harness::report::{open_output, write_csv};
use arbsim_track::builder::setup_tracker;
use arbsim_track::{Tracker, info};

fn setup_trackers(config: &Config) -> Result<Tracker, SimError> {
    Ok(setup_tracker(&config.tracker_config()?)?)
}

fn main() -> Result<(), SimError> {
    let config = Config::parse_all_sources()?;
    let tracker = setup_trackers(&config)?;
    let engine = Engine::new(&tracker);
    let top = engine.top();

    let experiment = config.experiment_config()?;
    info!(top ; "{:?}", experiment);

    let rows = run_experiment(top, &experiment)?;

    let output = config.output.clone().unwrap_or_else(|| "-".into());
    let writer = open_output(&output).map_err(HarnessError::from)?;
    write_csv(writer, &rows)?;
    info!(top ; "{} rows written to {}", rows.len(), output.display());

    engine.shutdown();
    Ok(())
}
