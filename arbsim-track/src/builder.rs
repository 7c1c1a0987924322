// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Library functions to build trackers as defined by the user.

use std::fs;
use std::io::{self, BufWriter};
use std::sync::Arc;

use crate::tracker::{EntityManager, TextTracker, TrackConfigError, dev_null_tracker};
use crate::{Tracker, Writer};

/// Configuration options for the text tracker.
pub struct TrackerConfig<'a> {
    /// Enable this tracker.
    pub enable: bool,

    /// Set the level at which this tracker should be enabled.
    pub level: log::Level,

    /// A regular expression to match which entities should have this level
    /// applied. All others only emit errors.
    pub filter_regex: &'a str,

    /// The name of the file to which the tracker will write. Use `-` for
    /// stdout and `None` for stderr.
    pub file: Option<&'a str>,
}

impl Default for TrackerConfig<'_> {
    fn default() -> Self {
        Self {
            enable: true,
            level: log::Level::Warn,
            filter_regex: "",
            file: None,
        }
    }
}

/// Create a text tracker as described by the `config`.
///
/// The user can pass a filter regular expression which will set the level only
/// for matching Entities and set all other Entities to only emit errors.
pub fn setup_tracker(config: &TrackerConfig) -> Result<Tracker, TrackConfigError> {
    if !config.enable {
        return Ok(dev_null_tracker());
    }

    let default_level = if config.filter_regex.is_empty() {
        config.level
    } else {
        log::Level::Error
    };

    let mut entity_manager = EntityManager::new(default_level);
    if !config.filter_regex.is_empty() {
        entity_manager.add_entity_level_filter(config.filter_regex, config.level)?;
    }

    let writer: Writer = match config.file {
        None => Box::new(BufWriter::new(io::stderr())),
        Some("-") => Box::new(BufWriter::new(io::stdout())),
        Some(file) => match fs::File::create(file) {
            Ok(f) => Box::new(BufWriter::new(f)),
            Err(e) => {
                return Err(TrackConfigError(format!(
                    "Failed to create log file {file}: {e}"
                )));
            }
        },
    };
    Ok(Arc::new(TextTracker::new(entity_manager, writer)))
}
